//! Heuristic bill detection over email metadata.
//!
//! Scoring is additive and saturating: each signal adds a fixed bonus and the
//! total is clamped at 1.0. Points are kept in hundredths so the threshold
//! comparison is exact (three keyword hits are 0.30, not 0.30000000000000004).
//!
//! Signals:
//!   +0.10 per bill keyword anywhere in from + subject + snippet
//!   +0.15 per billing-sender token in From
//!   +0.20 for a dollar amount strictly inside the sanity bounds
//!   +0.10 for the first due-date pattern that matches

use anyhow::Result;
use billport_core::Category;
use regex::Regex;
use tracing::debug;

use crate::keywords::{BILL_KEYWORDS, BILL_SENDERS, CATEGORY_RULES};
use crate::types::{BillInfo, EmailBillCandidate, EmailMessage};

const KEYWORD_POINTS: u32 = 10;
const SENDER_POINTS: u32 = 15;
const AMOUNT_POINTS: u32 = 20;
const DUE_DATE_POINTS: u32 = 10;
const MAX_POINTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanPolicy {
    /// Candidates must score strictly above this
    pub threshold: f64,
    /// Exclusive lower bound for the amount bonus
    pub min_amount: f64,
    /// Exclusive upper bound for the amount bonus
    pub max_amount: f64,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            min_amount: 5.0,
            max_amount: 10_000.0,
        }
    }
}

/// Compiled patterns plus policy. Build once and share; extraction takes `&self`.
#[derive(Debug, Clone)]
pub struct BillExtractor {
    policy: ScanPolicy,
    amount_re: Regex,
    due_date_res: Vec<Regex>,
}

impl BillExtractor {
    pub fn new() -> Result<Self> {
        Self::with_policy(ScanPolicy::default())
    }

    pub fn with_policy(policy: ScanPolicy) -> Result<Self> {
        let amount_re = Regex::new(r"\$\s*(\d+(?:,\d{3})*(?:\.\d{2})?)")?;

        // Tried in order; first match wins.
        let due_date_res = vec![
            Regex::new(r"(?i)due\s*(?:date|by|on)?:?\s*(\w+\s+\d{1,2},?\s*\d{4})")?,
            Regex::new(r"(?i)payment\s+due:?\s*(\w+\s+\d{1,2},?\s*\d{4})")?,
            Regex::new(r"(\d{1,2}/\d{1,2}/\d{2,4})")?,
        ];

        Ok(Self {
            policy,
            amount_re,
            due_date_res,
        })
    }

    pub fn policy(&self) -> &ScanPolicy {
        &self.policy
    }

    /// Score one message and pull out best-effort fields. Never fails.
    pub fn extract(&self, from: &str, subject: &str, snippet: &str) -> BillInfo {
        let text = format!("{from} {subject} {snippet}");
        let lower = text.to_lowercase();
        let from_lower = from.to_lowercase();

        let mut points = 0u32;

        points += KEYWORD_POINTS * count_hits(&lower, BILL_KEYWORDS);
        points += SENDER_POINTS * count_hits(&from_lower, BILL_SENDERS);

        let amount = self.find_amount(&text);
        if amount.is_some_and(|a| a > self.policy.min_amount && a < self.policy.max_amount) {
            points += AMOUNT_POINTS;
        }

        let due_date = self.find_due_date(&text);
        if due_date.is_some() {
            points += DUE_DATE_POINTS;
        }

        BillInfo {
            company: extract_company(from),
            amount,
            due_date,
            category: categorize_email(&lower),
            confidence: f64::from(points.min(MAX_POINTS)) / 100.0,
        }
    }

    pub fn candidate(&self, message: &EmailMessage) -> EmailBillCandidate {
        let info = self.extract(&message.from, &message.subject, &message.snippet);
        EmailBillCandidate::new(message, info)
    }

    /// Score a batch, keep those above the threshold, most bill-like first.
    pub fn scan(&self, messages: &[EmailMessage]) -> Vec<EmailBillCandidate> {
        let mut out: Vec<EmailBillCandidate> = messages
            .iter()
            .map(|m| self.candidate(m))
            .filter(|c| c.confidence > self.policy.threshold)
            .collect();

        // Stable: ties keep mailbox order.
        out.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        debug!(
            scanned = messages.len(),
            kept = out.len(),
            threshold = self.policy.threshold,
            "email bill scan"
        );
        out
    }

    /// First dollar amount in the text. Malformed numbers count as no amount.
    fn find_amount(&self, text: &str) -> Option<f64> {
        let caps = self.amount_re.captures(text)?;
        caps[1].replace(',', "").parse::<f64>().ok()
    }

    fn find_due_date(&self, text: &str) -> Option<String> {
        self.due_date_res
            .iter()
            .find_map(|re| re.captures(text))
            .map(|caps| caps[1].trim().to_string())
    }
}

fn count_hits(haystack: &str, needles: &[&str]) -> u32 {
    needles.iter().filter(|n| haystack.contains(*n)).count() as u32
}

/// Company name from a `From` header.
///
/// Prefers the display name (`"Rogers" <billing@rogers.com>`); otherwise the
/// second-level domain label of the address, capitalized; otherwise `Unknown`.
pub fn extract_company(from: &str) -> String {
    let from = from.trim();

    let display = from.split('<').next().unwrap_or("").replace('"', "");
    let display = display.trim();
    if !display.is_empty() && !display.contains('@') {
        return display.to_string();
    }

    let address = match (from.find('<'), from.rfind('>')) {
        (Some(start), Some(end)) if end > start => &from[start + 1..end],
        _ => from,
    };

    address
        .split_once('@')
        .map(|(_, domain)| domain.trim().split('.').collect::<Vec<_>>())
        .filter(|labels| labels.len() >= 2)
        .and_then(|labels| capitalize(labels[labels.len() - 2]))
        .unwrap_or_else(|| "Unknown".to_string())
}

fn capitalize(label: &str) -> Option<String> {
    let mut chars = label.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// First category in priority order whose keywords appear in `lower_text`.
pub fn categorize_email(lower_text: &str) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower_text.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}
