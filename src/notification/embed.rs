use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::deployment::{DeploymentEvent, EventType};

// ── Discord Embed Types ───────────────────────────────────────

/// A Discord rich embed, as accepted by incoming webhooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    /// ISO-8601 timestamp rendered by Discord in the viewer's timezone.
    pub timestamp: String,
    pub footer: EmbedFooter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn new(name: &str, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            inline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Body posted to the Discord webhook. Discord accepts up to ten embeds per
/// message; the relay always sends one.
#[derive(Debug, Serialize)]
pub struct WebhookMessage<'a> {
    pub embeds: [&'a Embed; 1],
}

impl<'a> WebhookMessage<'a> {
    pub fn single(embed: &'a Embed) -> Self {
        Self { embeds: [embed] }
    }
}

// ── Filtering ─────────────────────────────────────────────────

pub const FOOTER_TEXT: &str = "Vercel Deployment";
const DEFAULT_TARGET: &str = "production";
const DEPLOYMENT_ID_PREFIX_LEN: usize = 12;

/// Whether an event of this type should produce a notification.
///
/// `Failed` is a known type but is not relayed.
pub fn is_handled(event_type: &EventType) -> bool {
    matches!(
        event_type,
        EventType::Created | EventType::Succeeded | EventType::Promoted
    )
}

// ── Lookup Tables ─────────────────────────────────────────────

pub fn title_for(event_type: &EventType) -> &'static str {
    match event_type {
        EventType::Created => "🚀 Deployment Started",
        EventType::Succeeded => "✅ Deployment Successful",
        EventType::Failed => "❌ Deployment Failed",
        EventType::Promoted => "🎯 Deployment Promoted",
        EventType::Unknown(_) => "📦 Deployment Event",
    }
}

pub fn color_for(event_type: &EventType) -> u32 {
    match event_type {
        EventType::Created => 0x3498db,
        EventType::Succeeded => 0x2ecc71,
        EventType::Failed => 0xe74c3c,
        EventType::Promoted => 0x9b59b6,
        EventType::Unknown(_) => 0x95a5a6,
    }
}

fn phrase_for(event_type: &EventType) -> &'static str {
    match event_type {
        EventType::Created => "started",
        EventType::Succeeded => "completed successfully",
        EventType::Promoted => "was promoted to production",
        EventType::Failed | EventType::Unknown(_) => "failed",
    }
}

// ── Formatting ────────────────────────────────────────────────

/// Short form of a deployment ID: the first 12 characters plus `...`.
/// The ellipsis is appended even when the ID is shorter than 12 characters.
pub fn truncate_deployment_id(id: &str) -> String {
    let prefix: String = id.chars().take(DEPLOYMENT_ID_PREFIX_LEN).collect();
    format!("{}...", prefix)
}

/// Render epoch milliseconds as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn iso_timestamp(epoch_ms: i64) -> anyhow::Result<String> {
    let ts: DateTime<Utc> = DateTime::from_timestamp_millis(epoch_ms)
        .with_context(|| format!("createdAt {} is out of range", epoch_ms))?;
    Ok(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Build the Discord embed for a deployment event.
///
/// Does not consult the allow-set; callers check [`is_handled`] first.
/// Fails only when `createdAt` is missing or cannot be represented as a date.
pub fn create_embed(event: &DeploymentEvent) -> anyhow::Result<Embed> {
    let payload = &event.payload;
    let deployment = &payload.deployment;
    let event_type = &event.event_type;

    let created_at = event.created_at.context("event has no createdAt")?;
    let timestamp = iso_timestamp(created_at)?;

    let project = non_empty(payload.project.name.as_deref()).unwrap_or(payload.name.as_str());
    let target = non_empty(deployment.target.as_deref()).unwrap_or(DEFAULT_TARGET);

    let mut fields = vec![
        EmbedField::new("Project", project, true),
        EmbedField::new("Branch/Target", target, true),
        EmbedField::new("Deployment ID", truncate_deployment_id(&deployment.id), true),
    ];

    if matches!(event_type, EventType::Succeeded | EventType::Promoted) {
        if let Some(url) = non_empty(payload.url.as_deref()) {
            fields.push(EmbedField::new("Live URL", format!("https://{}", url), false));
        }
    }

    if let Some(inspector) = non_empty(deployment.inspector_url.as_deref()) {
        fields.push(EmbedField::new("Inspector", inspector, false));
    }

    Ok(Embed {
        title: title_for(event_type).to_string(),
        description: format!("**{}** deployment {}", payload.name, phrase_for(event_type)),
        color: color_for(event_type),
        fields,
        timestamp,
        footer: EmbedFooter {
            text: FOOTER_TEXT.to_string(),
        },
    })
}

/// Parse a raw event and render the webhook body it would produce, pretty-printed.
/// Returns `None` for event types that are not relayed.
pub fn preview(raw: &[u8]) -> anyhow::Result<Option<String>> {
    let event: DeploymentEvent =
        serde_json::from_slice(raw).context("input is not a deployment event")?;
    if !is_handled(&event.event_type) {
        return Ok(None);
    }
    let embed = create_embed(&event)?;
    Ok(Some(serde_json::to_string_pretty(&WebhookMessage::single(&embed))?))
}

// ── Tests ─────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(event_type: &str) -> DeploymentEvent {
        serde_json::from_value(json!({
            "type": event_type,
            "createdAt": 1_704_067_200_000_i64,
            "payload": {
                "deployment": {
                    "id": "abcdef1234567890",
                    "url": "my-app-git-main.vercel.app",
                    "name": "my-app"
                },
                "project": { "id": "prj_1" },
                "name": "my-app",
                "url": "example.vercel.app"
            }
        }))
        .unwrap()
    }

    fn field<'a>(embed: &'a Embed, name: &str) -> Option<&'a EmbedField> {
        embed.fields.iter().find(|f| f.name == name)
    }

    #[test]
    fn test_allow_set() {
        assert!(is_handled(&EventType::Created));
        assert!(is_handled(&EventType::Succeeded));
        assert!(is_handled(&EventType::Promoted));
        assert!(!is_handled(&EventType::Failed));
        assert!(!is_handled(&EventType::Unknown("deployment.canceled".into())));
    }

    #[test]
    fn test_base_fields_in_order() {
        let embed = create_embed(&event("deployment.created")).unwrap();
        let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Project", "Branch/Target", "Deployment ID"]);
        assert!(embed.fields.iter().all(|f| f.inline));
        assert_eq!(embed.footer.text, "Vercel Deployment");
    }

    #[test]
    fn test_succeeded_adds_live_url() {
        let embed = create_embed(&event("deployment.succeeded")).unwrap();
        let live = field(&embed, "Live URL").unwrap();
        assert_eq!(live.value, "https://example.vercel.app");
        assert!(!live.inline);
        assert_eq!(embed.title, "✅ Deployment Successful");
        assert_eq!(embed.color, 0x2ecc71);
        assert_eq!(embed.description, "**my-app** deployment completed successfully");
    }

    #[test]
    fn test_promoted_adds_live_url() {
        let embed = create_embed(&event("deployment.promoted")).unwrap();
        assert!(field(&embed, "Live URL").is_some());
        assert_eq!(embed.description, "**my-app** deployment was promoted to production");
    }

    #[test]
    fn test_created_has_no_live_url() {
        let embed = create_embed(&event("deployment.created")).unwrap();
        assert!(field(&embed, "Live URL").is_none());
        assert_eq!(embed.description, "**my-app** deployment started");
    }

    #[test]
    fn test_live_url_skipped_without_url() {
        let mut ev = event("deployment.succeeded");
        ev.payload.url = None;
        let embed = create_embed(&ev).unwrap();
        assert!(field(&embed, "Live URL").is_none());

        ev.payload.url = Some(String::new());
        let embed = create_embed(&ev).unwrap();
        assert!(field(&embed, "Live URL").is_none());
    }

    #[test]
    fn test_live_url_is_not_validated() {
        let mut ev = event("deployment.succeeded");
        ev.payload.url = Some("https://already.vercel.app".into());
        let embed = create_embed(&ev).unwrap();
        assert_eq!(field(&embed, "Live URL").unwrap().value, "https://https://already.vercel.app");
    }

    #[test]
    fn test_target_defaults_to_production() {
        let embed = create_embed(&event("deployment.created")).unwrap();
        assert_eq!(field(&embed, "Branch/Target").unwrap().value, "production");

        let mut ev = event("deployment.created");
        ev.payload.deployment.target = Some("preview".into());
        let embed = create_embed(&ev).unwrap();
        assert_eq!(field(&embed, "Branch/Target").unwrap().value, "preview");
    }

    #[test]
    fn test_deployment_id_truncation() {
        let embed = create_embed(&event("deployment.created")).unwrap();
        assert_eq!(field(&embed, "Deployment ID").unwrap().value, "abcdef123456...");
        assert_eq!(truncate_deployment_id("abc"), "abc...");
        assert_eq!(truncate_deployment_id(""), "...");
    }

    #[test]
    fn test_project_name_falls_back_to_event_name() {
        let embed = create_embed(&event("deployment.created")).unwrap();
        assert_eq!(field(&embed, "Project").unwrap().value, "my-app");

        let mut ev = event("deployment.created");
        ev.payload.project.name = Some("Marketing Site".into());
        let embed = create_embed(&ev).unwrap();
        assert_eq!(field(&embed, "Project").unwrap().value, "Marketing Site");
    }

    #[test]
    fn test_inspector_field_appended_last() {
        let mut ev = event("deployment.succeeded");
        ev.payload.deployment.inspector_url = Some("https://vercel.com/acme/my-app/xyz".into());
        let embed = create_embed(&ev).unwrap();
        let last = embed.fields.last().unwrap();
        assert_eq!(last.name, "Inspector");
        assert_eq!(last.value, "https://vercel.com/acme/my-app/xyz");
        assert_eq!(embed.fields.len(), 5);
    }

    #[test]
    fn test_timestamp_is_iso8601_millis() {
        let embed = create_embed(&event("deployment.created")).unwrap();
        assert_eq!(embed.timestamp, "2024-01-01T00:00:00.000Z");
        assert_eq!(iso_timestamp(1_704_067_200_123).unwrap(), "2024-01-01T00:00:00.123Z");
    }

    #[test]
    fn test_missing_created_at_fails() {
        let mut ev = event("deployment.created");
        ev.created_at = None;
        assert!(create_embed(&ev).is_err());

        ev.created_at = Some(i64::MAX);
        assert!(create_embed(&ev).is_err());
    }

    #[test]
    fn test_fallback_title_and_color() {
        let unknown = EventType::Unknown("deployment.canceled".into());
        assert_eq!(title_for(&unknown), "📦 Deployment Event");
        assert_eq!(color_for(&unknown), 0x95a5a6);

        let embed = create_embed(&event("deployment.canceled")).unwrap();
        assert_eq!(embed.description, "**my-app** deployment failed");
    }

    #[test]
    fn test_failed_lookup_values() {
        assert_eq!(title_for(&EventType::Failed), "❌ Deployment Failed");
        assert_eq!(color_for(&EventType::Failed), 0xe74c3c);
    }

    #[test]
    fn test_preview() {
        let raw = br#"{"type":"deployment.created","createdAt":0,"payload":{"deployment":{"id":"dpl_1"},"name":"site"}}"#;
        let out = preview(raw).unwrap().unwrap();
        assert!(out.contains("\"embeds\""));
        assert!(out.contains("1970-01-01T00:00:00.000Z"));

        let failed = br#"{"type":"deployment.failed","createdAt":0,"payload":{"deployment":{"id":"dpl_1"},"name":"site"}}"#;
        assert!(preview(failed).unwrap().is_none());

        assert!(preview(b"not json").is_err());
    }

    #[test]
    fn test_webhook_message_wraps_single_embed() {
        let embed = create_embed(&event("deployment.created")).unwrap();
        let body = serde_json::to_value(WebhookMessage::single(&embed)).unwrap();
        assert_eq!(body["embeds"].as_array().unwrap().len(), 1);
        assert_eq!(body["embeds"][0]["title"], "🚀 Deployment Started");
        assert_eq!(body["embeds"][0]["color"], 0x3498db);
    }
}
