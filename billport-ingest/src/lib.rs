//! billport-ingest: email bill extraction and mail-export loading.

pub mod extractor;
pub mod keywords;
pub mod mailbox;
pub mod types;

pub use extractor::{categorize_email, extract_company, BillExtractor, ScanPolicy};
pub use keywords::search_query;
pub use mailbox::{parse_mail_export_csv, read_mail_export};
pub use types::{BillInfo, EmailBillCandidate, EmailMessage};
