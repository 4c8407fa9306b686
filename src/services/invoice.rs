//! Invoice assembly and rendering.
//!
//! An invoice is rebuilt from live ledger state each time it is requested:
//! totals reflect every payment recorded so far, while the line for the
//! requested transaction always shows that transaction's own amount.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::config::IssuerConfig;
use crate::entities::{leads, payment_transactions};
use crate::error::{AppError, AppResult};
use crate::money::{format_amount, from_minor_units};
use crate::services::ledger::{find_payment, find_project, list_transactions};

#[derive(Debug, Clone)]
pub struct BillTo {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub college: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InvoiceLine {
    pub transaction_id: i32,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub payment_mode: Option<String>,
    pub reference: Option<String>,
}

impl From<&payment_transactions::Model> for InvoiceLine {
    fn from(t: &payment_transactions::Model) -> Self {
        Self {
            transaction_id: t.id,
            date: t.transaction_date,
            amount: from_minor_units(t.amount),
            payment_mode: t.payment_mode.clone(),
            reference: t.invoice_ref.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Invoice {
    pub number: String,
    pub issued_at: DateTime<Utc>,
    pub issuer: IssuerConfig,
    pub bill_to: Option<BillTo>,
    pub project_id: i32,
    pub project_title: String,
    pub total_cost: Decimal,
    pub amount_paid: Decimal,
    pub pending_balance: Decimal,
    pub payment_structure: Option<String>,
    pub transaction: InvoiceLine,
    /// Newest first.
    pub history: Vec<InvoiceLine>,
}

impl Invoice {
    /// `Invoice_<invoice_ref or transaction id>.<extension>`
    pub fn file_name(&self, extension: &str) -> String {
        let key = self
            .transaction
            .reference
            .clone()
            .unwrap_or_else(|| self.transaction.transaction_id.to_string());
        let key: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("Invoice_{key}.{extension}")
    }
}

/// Builds the invoice for one transaction of a project's ledger.
pub async fn assemble_invoice(
    db: &DatabaseConnection,
    issuer: &IssuerConfig,
    project_id: i32,
    transaction_id: i32,
) -> AppResult<Invoice> {
    let project = find_project(db, project_id).await?;
    let payment = find_payment(db, project_id).await?;

    let transaction = payment_transactions::Entity::find_by_id(transaction_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("PaymentTransaction", transaction_id))?;
    if transaction.payment_id != payment.id {
        return Err(AppError::forbidden(format!(
            "Transaction {transaction_id} does not belong to project {project_id}"
        )));
    }

    let lead = match project.lead_id {
        Some(lead_id) => leads::Entity::find_by_id(lead_id).one(db).await?,
        None => None,
    };
    let history = list_transactions(db, payment.id).await?;

    Ok(Invoice {
        number: transaction
            .invoice_ref
            .clone()
            .unwrap_or_else(|| format!("TRX-{}", transaction.id)),
        issued_at: Utc::now(),
        issuer: issuer.clone(),
        bill_to: lead.map(|l| BillTo {
            name: l.student_name,
            phone: l.phone,
            email: l.email,
            college: l.college,
        }),
        project_id: project.id,
        project_title: project.title,
        total_cost: from_minor_units(payment.total_cost),
        amount_paid: from_minor_units(payment.amount_paid),
        pending_balance: from_minor_units(payment.pending_balance),
        payment_structure: payment.payment_structure,
        transaction: InvoiceLine::from(&transaction),
        history: history.iter().map(InvoiceLine::from).collect(),
    })
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub extension: &'static str,
}

pub trait InvoiceRenderer: Send + Sync {
    fn render(&self, invoice: &Invoice) -> AppResult<RenderedDocument>;
}

/// Fixed-width text invoice.
#[derive(Debug, Clone, Default)]
pub struct PlainTextInvoiceRenderer;

const RULE: &str = "------------------------------------------------------------";

impl PlainTextInvoiceRenderer {
    fn write(&self, invoice: &Invoice) -> Result<String, std::fmt::Error> {
        let symbol = invoice.issuer.currency_symbol.as_str();
        let money = |amount: Decimal| format_amount(symbol, amount);
        let mut out = String::new();

        writeln!(out, "{}", invoice.issuer.name)?;
        for line in [
            &invoice.issuer.address,
            &invoice.issuer.email,
            &invoice.issuer.website,
            &invoice.issuer.phone,
        ] {
            if !line.is_empty() {
                writeln!(out, "{line}")?;
            }
        }
        writeln!(out, "{RULE}")?;
        writeln!(out, "INVOICE {}", invoice.number)?;
        writeln!(out, "Date: {}", invoice.issued_at.format("%Y-%m-%d %H:%M"))?;
        writeln!(out)?;

        writeln!(out, "Bill To:")?;
        match &invoice.bill_to {
            Some(bill_to) => {
                writeln!(out, "  {}", bill_to.name)?;
                writeln!(out, "  {}", bill_to.phone)?;
                if let Some(email) = &bill_to.email {
                    writeln!(out, "  {email}")?;
                }
                if let Some(college) = &bill_to.college {
                    writeln!(out, "  {college}")?;
                }
            }
            None => writeln!(out, "  N/A")?,
        }
        writeln!(out)?;

        writeln!(out, "Project: {} (#{})", invoice.project_title, invoice.project_id)?;
        if let Some(structure) = &invoice.payment_structure {
            writeln!(out, "Payment structure: {structure}")?;
        }
        writeln!(out, "Total cost:      {}", money(invoice.total_cost))?;
        writeln!(out, "Amount paid:     {}", money(invoice.amount_paid))?;
        writeln!(out, "Pending balance: {}", money(invoice.pending_balance))?;
        writeln!(out, "{RULE}")?;

        let t = &invoice.transaction;
        writeln!(out, "This payment")?;
        writeln!(out, "  Date:      {}", t.date.format("%Y-%m-%d %H:%M"))?;
        writeln!(out, "  Amount:    {}", money(t.amount))?;
        writeln!(out, "  Mode:      {}", t.payment_mode.as_deref().unwrap_or("N/A"))?;
        writeln!(out, "  Reference: {}", t.reference.as_deref().unwrap_or("N/A"))?;
        writeln!(out, "{RULE}")?;

        writeln!(out, "Payment history")?;
        for line in &invoice.history {
            writeln!(
                out,
                "  {}  {:>18}  {:<14} {}",
                line.date.format("%Y-%m-%d"),
                money(line.amount),
                line.payment_mode.as_deref().unwrap_or("-"),
                line.reference.as_deref().unwrap_or("-"),
            )?;
        }
        writeln!(out, "{RULE}")?;
        writeln!(out, "Thank you for your business.")?;
        Ok(out)
    }
}

impl InvoiceRenderer for PlainTextInvoiceRenderer {
    fn render(&self, invoice: &Invoice) -> AppResult<RenderedDocument> {
        let text = self
            .write(invoice)
            .map_err(|e| AppError::Internal(format!("Failed to render invoice: {e}")))?;
        Ok(RenderedDocument {
            bytes: text.into_bytes(),
            content_type: "text/plain; charset=utf-8",
            extension: "txt",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample() -> Invoice {
        let first = InvoiceLine {
            transaction_id: 1,
            date: Utc.with_ymd_and_hms(2026, 1, 12, 10, 0, 0).unwrap(),
            amount: dec!(20000),
            payment_mode: Some("UPI".into()),
            reference: Some("INV-001".into()),
        };
        let second = InvoiceLine {
            transaction_id: 2,
            date: Utc.with_ymd_and_hms(2026, 2, 2, 10, 0, 0).unwrap(),
            amount: dec!(15000),
            payment_mode: Some("Cash".into()),
            reference: None,
        };
        Invoice {
            number: "INV-001".into(),
            issued_at: Utc.with_ymd_and_hms(2026, 2, 3, 9, 30, 0).unwrap(),
            issuer: IssuerConfig::default(),
            bill_to: Some(BillTo {
                name: "Asha".into(),
                phone: "9990001111".into(),
                email: None,
                college: Some("IIT Madras".into()),
            }),
            project_id: 4,
            project_title: "Crop Yield Predictor".into(),
            total_cost: dec!(50000),
            amount_paid: dec!(35000),
            pending_balance: dec!(15000),
            payment_structure: Some("40/30/30".into()),
            transaction: first.clone(),
            history: vec![second, first],
        }
    }

    #[test]
    fn test_file_name_prefers_reference() {
        let mut invoice = sample();
        assert_eq!(invoice.file_name("txt"), "Invoice_INV-001.txt");
        invoice.transaction.reference = None;
        assert_eq!(invoice.file_name("txt"), "Invoice_1.txt");
        invoice.transaction.reference = Some("A/B 7".into());
        assert_eq!(invoice.file_name("txt"), "Invoice_A_B_7.txt");
    }

    #[test]
    fn test_plain_text_contents() {
        let rendered = PlainTextInvoiceRenderer.render(&sample()).unwrap();
        assert_eq!(rendered.extension, "txt");
        let text = String::from_utf8(rendered.bytes).unwrap();
        assert!(text.starts_with("DevNest\n"));
        assert!(text.contains("INVOICE INV-001"));
        assert!(text.contains("  Asha\n"));
        assert!(text.contains("Total cost:      ₹ 50,000.00"));
        assert!(text.contains("Pending balance: ₹ 15,000.00"));
        assert!(text.contains("  Amount:    ₹ 20,000.00"));
        let newer = text.find("2026-02-02").unwrap();
        let older = text.find("2026-01-12  ").unwrap();
        assert!(newer < older);
    }
}
