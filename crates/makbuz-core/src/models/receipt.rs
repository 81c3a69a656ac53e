//! Receipt data models.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentinel shown for fields that could not be extracted. The presentation
/// contract is uniform: consumers always see a string, never a null.
pub const NOT_FOUND: &str = "N/A";

/// The field kinds the pipeline extracts. Used as the diagnostic
/// vocabulary in logs and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptField {
    Date,
    Time,
    TotalCost,
    Vat,
    TaxOfficeName,
    TaxOfficeNumber,
    PaymentMethod,
    ProductName,
    ProductCost,
    ReceiptNumber,
}

impl ReceiptField {
    /// Column label used in CSV/text output.
    pub fn label(&self) -> &'static str {
        match self {
            ReceiptField::Date => "Date",
            ReceiptField::Time => "Time",
            ReceiptField::TotalCost => "Total Cost",
            ReceiptField::Vat => "VAT",
            ReceiptField::TaxOfficeName => "Tax Office Name",
            ReceiptField::TaxOfficeNumber => "Tax Office Number",
            ReceiptField::PaymentMethod => "Payment Method",
            ReceiptField::ProductName => "Product",
            ReceiptField::ProductCost => "Product Cost",
            ReceiptField::ReceiptNumber => "Receipt No",
        }
    }
}

impl fmt::Display for ReceiptField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An extracted field value plus the engine that produced it.
///
/// A present value always satisfies the field's validity rules; absence
/// renders as the `"N/A"` sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    #[serde(
        serialize_with = "serialize_sentinel",
        deserialize_with = "deserialize_sentinel"
    )]
    pub value: Option<String>,

    /// Name of the OCR engine whose text yielded the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
}

fn serialize_sentinel<S: Serializer>(
    value: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(NOT_FOUND))
}

fn deserialize_sentinel<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| v != NOT_FOUND))
}

impl FieldValue {
    pub fn found(value: String, engine: &str) -> Self {
        Self {
            value: Some(value),
            engine: Some(engine.to_string()),
        }
    }

    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }

    /// The canonical value, or the `"N/A"` sentinel.
    pub fn display(&self) -> &str {
        self.value.as_deref().unwrap_or(NOT_FOUND)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// One result row per input image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub filename: String,

    pub date: FieldValue,
    pub time: FieldValue,
    pub tax_office_name: FieldValue,
    pub tax_office_number: FieldValue,
    pub total_cost: FieldValue,
    pub vat: FieldValue,
    pub payment_method: FieldValue,
    pub receipt_number: FieldValue,

    /// Parallel lists: `product_costs[i]` belongs to `products[i]`.
    pub products: Vec<String>,
    pub product_costs: Vec<String>,
}

impl ReceiptRecord {
    pub fn empty(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            ..Default::default()
        }
    }

    /// Number of scalar fields that resolved to a value.
    pub fn found_count(&self) -> usize {
        self.scalar_fields()
            .iter()
            .filter(|(_, v)| v.is_found())
            .count()
    }

    /// Scalar fields with their kinds, in presentation order.
    pub fn scalar_fields(&self) -> [(ReceiptField, &FieldValue); 8] {
        [
            (ReceiptField::Date, &self.date),
            (ReceiptField::Time, &self.time),
            (ReceiptField::TaxOfficeName, &self.tax_office_name),
            (ReceiptField::TaxOfficeNumber, &self.tax_office_number),
            (ReceiptField::TotalCost, &self.total_cost),
            (ReceiptField::Vat, &self.vat),
            (ReceiptField::PaymentMethod, &self.payment_method),
            (ReceiptField::ReceiptNumber, &self.receipt_number),
        ]
    }
}
