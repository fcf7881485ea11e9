//! Bill record types and the lenient decoding used for store records.

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::status::{classify, Classification, StatusPolicy};
use crate::time::local_date;

/// Currency every amount in the app is denominated in.
pub const CURRENCY: &str = "CAD";

/// `$12.50 CAD`
pub fn format_amount(amount: f64) -> String {
    format!("${amount:.2} {CURRENCY}")
}

/// When a bill is due.
///
/// Bills entered locally carry a calendar day. Store rows may carry an
/// instant instead; its calendar day depends on the zone it is viewed from,
/// so it is only resolved against the same zone as "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDate {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

impl DueDate {
    /// `YYYY-MM-DD` is a day, RFC 3339 an instant. Anything else is `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(DueDate::Day(d));
        }
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| DueDate::Instant(dt.with_timezone(&Utc)))
    }

    pub fn date_in(&self, tz: Tz) -> NaiveDate {
        match self {
            DueDate::Day(d) => *d,
            DueDate::Instant(ts) => local_date(*ts, tz),
        }
    }
}

impl From<NaiveDate> for DueDate {
    fn from(d: NaiveDate) -> Self {
        DueDate::Day(d)
    }
}

impl std::fmt::Display for DueDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DueDate::Day(d) => write!(f, "{d}"),
            DueDate::Instant(ts) => f.write_str(&ts.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)),
        }
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A recurring payable obligation owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// Store-assigned identifier
    pub id: String,
    /// Owning user; every lookup filters on it
    #[serde(alias = "userId")]
    pub owner_id: String,
    /// Display name, e.g. "Toronto Hydro"
    #[serde(alias = "name")]
    pub provider_name: String,
    #[serde(default, alias = "billType")]
    pub category: Category,
    /// Non-negative amount in [`CURRENCY`]
    #[serde(deserialize_with = "de_amount")]
    pub amount: f64,
    /// `None` only when a stored record carried a missing or unreadable date
    #[serde(default, deserialize_with = "de_due_date")]
    pub due_date: Option<DueDate>,
    #[serde(default, deserialize_with = "de_paid_flag")]
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// Only bills with a positive amount can be paid.
    pub fn is_actionable(&self) -> bool {
        self.amount > 0.0
    }

    /// Calendar due date as seen from `tz`.
    pub fn due_date_in(&self, tz: Tz) -> Option<NaiveDate> {
        self.due_date.map(|d| d.date_in(tz))
    }

    /// Derive the display status for `today`, which must be the calendar
    /// date in `tz`. Never stored.
    pub fn classify(&self, today: NaiveDate, tz: Tz, policy: StatusPolicy) -> Classification {
        classify(self.due_date_in(tz), self.is_paid, today, policy)
    }
}

/// Input for creating a bill. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub owner_id: String,
    pub provider_name: String,
    pub category: Category,
    pub amount: f64,
    pub due_date: NaiveDate,
}

impl NewBill {
    pub fn new(
        owner_id: impl Into<String>,
        provider_name: impl Into<String>,
        category: Category,
        amount: f64,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            provider_name: provider_name.into(),
            category,
            amount,
            due_date,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.owner_id.trim().is_empty() {
            bail!("bill must have an owner");
        }
        if self.provider_name.trim().is_empty() {
            bail!("provider name must not be empty");
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            bail!("invalid amount {}: must be a non-negative number", self.amount);
        }
        Ok(())
    }

    pub(crate) fn into_bill(self, id: String, now: DateTime<Utc>) -> Bill {
        Bill {
            id,
            owner_id: self.owner_id,
            provider_name: self.provider_name.trim().to_string(),
            category: self.category,
            amount: self.amount,
            due_date: Some(DueDate::Day(self.due_date)),
            is_paid: false,
            created_at: now,
        }
    }
}

/// Closed set of bill categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Utilities,
    Internet,
    Phone,
    Insurance,
    Subscription,
    CreditCard,
    Banking,
    Housing,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Utilities,
        Category::Internet,
        Category::Phone,
        Category::Insurance,
        Category::Subscription,
        Category::CreditCard,
        Category::Banking,
        Category::Housing,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Utilities => "utilities",
            Category::Internet => "internet",
            Category::Phone => "phone",
            Category::Insurance => "insurance",
            Category::Subscription => "subscription",
            Category::CreditCard => "credit-card",
            Category::Banking => "banking",
            Category::Housing => "housing",
            Category::Other => "other",
        }
    }

    /// Lenient label parsing. Anything unrecognized is `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "utilities" | "utility" | "hydro" | "hydro/utilities" | "electricity" | "gas"
            | "water" => Category::Utilities,
            "internet" | "wifi" | "broadband" => Category::Internet,
            "phone" | "mobile" | "wireless" => Category::Phone,
            "insurance" => Category::Insurance,
            "subscription" | "subscriptions" | "streaming" | "membership" => {
                Category::Subscription
            }
            "credit-card" | "credit card" | "creditcard" | "credit_card" => Category::CreditCard,
            "banking" | "bank" | "mortgage" => Category::Banking,
            "housing" | "rent" | "lease" => Category::Housing,
            _ => Category::Other,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Category::from_label).unwrap_or_default())
    }
}

// Stores hand amounts back as either a JSON number or a decimal string ("247.80").
fn de_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let amount = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid amount '{s}': {e}")))?,
    };
    if !amount.is_finite() || amount < 0.0 {
        return Err(serde::de::Error::custom(format!("amount must be non-negative, got {amount}")));
    }
    Ok(amount)
}

// Relational rows use 0/1, document rows use booleans.
fn de_paid_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Int(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Flag(b)) => b,
        Some(Raw::Int(n)) => n != 0,
        None => false,
    })
}

// Date strings, epoch millis and `{seconds, nanoseconds}` timestamp maps all
// show up in exported rows. Any other shape reads as no due date.
fn de_due_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DueDate>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Millis(i64),
        Timestamp {
            #[serde(alias = "_seconds")]
            seconds: i64,
            #[serde(default, alias = "_nanoseconds")]
            nanoseconds: u32,
        },
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => DueDate::parse(&s),
        Some(Raw::Millis(ms)) => DateTime::from_timestamp_millis(ms).map(DueDate::Instant),
        Some(Raw::Timestamp {
            seconds,
            nanoseconds,
        }) => DateTime::from_timestamp(seconds, nanoseconds).map(DueDate::Instant),
        Some(Raw::Other(_)) | None => None,
    })
}
