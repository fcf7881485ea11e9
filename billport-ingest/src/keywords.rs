//! Vocabulary tables for the email bill heuristics. All entries are lower-case.

use billport_core::Category;

/// Each keyword present anywhere in the message adds to the score once.
pub const BILL_KEYWORDS: &[&str] = &[
    "invoice", "bill", "payment due", "amount due", "statement",
    "utility", "hydro", "electricity", "gas", "water",
    "internet", "phone", "mobile", "wireless", "cable",
    "insurance", "mortgage", "rent", "lease",
    "subscription", "membership", "renewal",
    "credit card", "bank statement",
    "rogers", "bell", "telus", "shaw", "fido", "koodo", "virgin",
    "enbridge", "hydro one", "toronto hydro", "bc hydro",
    "netflix", "spotify", "amazon prime", "disney+",
    "td bank", "rbc", "scotiabank", "bmo", "cibc",
];

/// Tokens typical of automated billing senders, matched against `From` only.
pub const BILL_SENDERS: &[&str] = &[
    "noreply", "billing", "invoice", "payment", "statement",
    "customerservice", "support", "notifications",
];

/// Category keyword lists in priority order; the first list with a hit wins.
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Utilities, &["hydro", "electricity", "gas", "water", "utility", "enbridge"]),
    (Category::Phone, &["phone", "mobile", "wireless", "rogers", "bell", "telus", "fido", "koodo", "virgin"]),
    (Category::Internet, &["internet", "wifi", "broadband", "shaw", "cable"]),
    (Category::Insurance, &["insurance", "coverage", "policy", "premium"]),
    (Category::Subscription, &["subscription", "netflix", "spotify", "amazon", "disney", "membership"]),
    (Category::CreditCard, &["credit card", "visa", "mastercard", "amex"]),
    (Category::Banking, &["bank", "td", "rbc", "scotiabank", "bmo", "cibc", "mortgage"]),
    (Category::Housing, &["rent", "lease", "property", "condo"]),
];

/// Mail search query over the first `n` keywords, e.g. `"invoice" OR "bill"`.
pub fn search_query(n: usize) -> String {
    BILL_KEYWORDS
        .iter()
        .take(n)
        .map(|k| format!("\"{k}\""))
        .collect::<Vec<_>>()
        .join(" OR ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_lowercase() {
        let all = BILL_KEYWORDS
            .iter()
            .chain(BILL_SENDERS)
            .chain(CATEGORY_RULES.iter().flat_map(|(_, kws)| kws.iter()));
        for k in all {
            assert_eq!(*k, k.to_lowercase());
        }
    }

    #[test]
    fn test_category_priority_order() {
        let order: Vec<Category> = CATEGORY_RULES.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            order,
            vec![
                Category::Utilities,
                Category::Phone,
                Category::Internet,
                Category::Insurance,
                Category::Subscription,
                Category::CreditCard,
                Category::Banking,
                Category::Housing,
            ]
        );
    }

    #[test]
    fn test_search_query() {
        assert_eq!(search_query(3), "\"invoice\" OR \"bill\" OR \"payment due\"");
        assert_eq!(search_query(0), "");
    }
}
