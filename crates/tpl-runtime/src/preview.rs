#![forbid(unsafe_code)]

//! Preview collaborator and the sample data it renders with.
//!
//! The editor never inspects what a preview produces. It hands the current
//! document and a fixed [`SampleData`] set to a [`PreviewSink`] whenever the
//! preview chord fires.

use chrono::NaiveDate;
use serde::Serialize;
use tpl_model::Document;

/// Receives the document to render.
pub trait PreviewSink {
    fn show(&mut self, document: &Document, sample: &SampleData);
}

impl<F> PreviewSink for F
where
    F: FnMut(&Document, &SampleData),
{
    fn show(&mut self, document: &Document, sample: &SampleData) {
        self(document, sample);
    }
}

/// A sink that drops every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPreview;

impl PreviewSink for NoPreview {
    fn show(&mut self, _document: &Document, _sample: &SampleData) {}
}

/// Amount in cents.
pub type Cents = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleLine {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Cents,
    /// Percent.
    pub vat_rate: u32,
    pub net: Cents,
    pub vat: Cents,
    pub gross: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleInvoice {
    pub number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_net: Cents,
    pub total_vat: Cents,
    pub total_gross: Cents,
    pub lines: Vec<SampleLine>,
    pub payment_qr_payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub vat_number: String,
    pub kvk_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleCompany {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub kvk: String,
    pub vat_number: String,
    pub iban: String,
    pub bank_name: String,
}

/// Invoice, client and company values used for live previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleData {
    pub invoice: SampleInvoice,
    pub client: SampleClient,
    pub company: SampleCompany,
}

impl Default for SampleData {
    fn default() -> Self {
        Self {
            invoice: SampleInvoice {
                number: "INV-2025-001".into(),
                issue_date: NaiveDate::from_ymd_opt(2025, 11, 12).unwrap_or_default(),
                due_date: NaiveDate::from_ymd_opt(2025, 12, 12).unwrap_or_default(),
                total_net: 150_000,
                total_vat: 31_500,
                total_gross: 181_500,
                lines: vec![
                    SampleLine {
                        description: "Web Development Services".into(),
                        quantity: 40,
                        unit_price: 5_000,
                        vat_rate: 21,
                        net: 200_000,
                        vat: 42_000,
                        gross: 242_000,
                    },
                    SampleLine {
                        description: "Design Consultation".into(),
                        quantity: 10,
                        unit_price: 7_500,
                        vat_rate: 21,
                        net: 75_000,
                        vat: 15_750,
                        gross: 90_750,
                    },
                ],
                payment_qr_payload:
                    "BCD\n002\n1\nSCT\nMESSU BOUW\nNL91ABNA0417164300\nEUR1815.00\n\nINV-2025-001"
                        .into(),
            },
            client: SampleClient {
                name: "Example Client B.V.".into(),
                email: "client@example.com".into(),
                phone: "+31 20 123 4567".into(),
                address: "Amsterdam 1012 AB, Netherlands".into(),
                vat_number: "NL123456789B01".into(),
                kvk_number: "12345678".into(),
            },
            company: SampleCompany {
                name: "MESSU BOUW".into(),
                email: "info@messubouw.nl".into(),
                phone: "+31 6 12345678".into(),
                address: "Rotterdam 3011 AB, Netherlands".into(),
                kvk: "87654321".into(),
                vat_number: "NL987654321B01".into(),
                iban: "NL91ABNA0417164300".into(),
                bank_name: "ABN AMRO".into(),
            },
        }
    }
}
