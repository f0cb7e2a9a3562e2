use bff_connectors::{ConnectorError, EmailMessage, EmailRelay, RelayOutcome};
use bff_core::{Rfc3339Timestamp, now_utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Subject line of the daily report email.
pub const REPORT_SUBJECT: &str = "Daily BFF Report";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,

    pub value: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub headline: String,
    pub generated_at: Rfc3339Timestamp,
    pub sections: Vec<ReportSection>,
}

/// Compose the daily report.
///
/// Section contents are canned until metric aggregation is wired to real
/// sources; the shape is what downstream consumers already parse.
pub fn compose() -> DailyReport {
    DailyReport {
        headline: REPORT_SUBJECT.into(),
        generated_at: now_utc(),
        sections: vec![
            ReportSection {
                title: "Top of Funnel".into(),
                metric: Some("Leads".into()),
                value: json!(42),
                notes: None,
            },
            ReportSection {
                title: "Revenue Forecast".into(),
                metric: None,
                value: json!("$7,500 next 7 days"),
                notes: Some("Based on 5% conv.".into()),
            },
            ReportSection {
                title: "Content Plan".into(),
                metric: None,
                value: json!("12 posts scheduled (Ocoya)"),
                notes: None,
            },
            ReportSection {
                title: "Stock Windows".into(),
                metric: None,
                value: json!("7:45am, 11:55am, 3:35pm local"),
                notes: None,
            },
        ],
    }
}

/// Render the report as a small HTML email body.
pub fn render_html(report: &DailyReport) -> String {
    let pretty = serde_json::to_string_pretty(report)
        .unwrap_or_else(|_| "report serialization failed".into());
    format!("<h2>{}</h2><pre>{}</pre>", report.headline, pretty)
}

/// Email the report to the configured recipient.
pub async fn deliver(
    relay: &EmailRelay,
    recipient: &str,
    report: &DailyReport,
) -> Result<RelayOutcome, ConnectorError> {
    let message = EmailMessage {
        to: recipient.to_string(),
        subject: REPORT_SUBJECT.into(),
        html: render_html(report),
    };
    relay.send(&message).await
}
