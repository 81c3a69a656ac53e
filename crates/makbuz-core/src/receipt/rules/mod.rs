//! Rule-based field extractors for Turkish receipts.
//!
//! Every extractor is a pure function over one text blob: it never
//! panics, and a miss is `None`, which the pipeline renders as the
//! `"N/A"` sentinel. This keeps the orchestrator's try-next-engine loop
//! free of error plumbing.

pub mod amounts;
pub mod dates;
pub mod items;
pub mod patterns;
pub mod payment;
pub mod receipt_no;
pub mod tax_office;
pub mod times;

pub use amounts::{extract_total_cost, extract_vat};
pub use dates::extract_date;
pub use items::{extract_line_items, LineItems};
pub use payment::extract_payment_method;
pub use receipt_no::extract_receipt_number;
pub use tax_office::{extract_tax_office_name, extract_tax_office_number};
pub use times::extract_time;
