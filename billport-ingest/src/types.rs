use billport_core::Category;
use serde::{Deserialize, Serialize};

/// Header metadata of one message, as handed over by the mail client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub id: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub subject: String,
    /// Raw `Date` header, passed through untouched
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub snippet: String,
}

impl EmailMessage {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            subject: subject.into(),
            date: String::new(),
            snippet: snippet.into(),
        }
    }
}

/// Best-effort fields pulled out of one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillInfo {
    pub company: String,
    pub amount: Option<f64>,
    /// Matched text, not yet a structured date
    pub due_date: Option<String>,
    pub category: Category,
    /// Heuristic score in [0, 1]
    pub confidence: f64,
}

/// An unpersisted bill suggestion awaiting user review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailBillCandidate {
    /// Originating message id; never used as a bill id
    pub source_message_id: String,
    pub from: String,
    pub subject: String,
    pub date: String,
    pub snippet: String,
    pub company: String,
    pub amount: Option<f64>,
    pub due_date: Option<String>,
    pub category: Category,
    pub confidence: f64,
}

impl EmailBillCandidate {
    pub fn new(message: &EmailMessage, info: BillInfo) -> Self {
        Self {
            source_message_id: message.id.clone(),
            from: message.from.clone(),
            subject: message.subject.clone(),
            date: message.date.clone(),
            snippet: message.snippet.clone(),
            company: info.company,
            amount: info.amount,
            due_date: info.due_date,
            category: info.category,
            confidence: info.confidence,
        }
    }
}
