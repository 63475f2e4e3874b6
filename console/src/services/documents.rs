//! Document editing workflow
//!
//! One `DocumentEditor` per open editor view. It loads the reference
//! data the draft needs (materials, counterparties, current stock),
//! drives the draft through field edits, and submits the finished
//! payload. The draft is never discarded on a failed submit; the user
//! keeps their work and retries.

use shared::draft::{
    AvailabilityIndex, AvailabilityWarning, DocumentDraft, DocumentField, DocumentIdentity,
    LinePatch, SelectableMaterial,
};
use shared::models::{Client, DocumentKind, Issue, Material, Receipt, Supplier, Warehouse};
use shared::types::DocumentId;
use rust_decimal::Decimal;
use validator::Validate;

use crate::api::ApiClient;
use crate::error::{AppError, AppResult};

/// Outcome of a successful submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(DocumentId),
    Updated(DocumentId),
}

impl SubmitOutcome {
    pub fn document_id(&self) -> DocumentId {
        match *self {
            SubmitOutcome::Created(id) | SubmitOutcome::Updated(id) => id,
        }
    }
}

/// Stateful editor for one receipt or issue draft
pub struct DocumentEditor {
    api: ApiClient,
    pub draft: DocumentDraft,
    materials: Vec<Material>,
    warehouses: Vec<Warehouse>,
    suppliers: Vec<Supplier>,
    clients: Vec<Client>,
    availability: AvailabilityIndex,
}

impl DocumentEditor {
    /// Open the create flow for a new document
    pub async fn open_new(api: ApiClient, kind: DocumentKind) -> AppResult<Self> {
        Self::open(api, DocumentDraft::new(kind)).await
    }

    /// Open the edit flow for a persisted receipt
    pub async fn open_receipt(api: ApiClient, receipt: &Receipt) -> AppResult<Self> {
        Self::open(api, DocumentDraft::from_receipt(receipt)).await
    }

    /// Open the edit flow for a persisted issue
    pub async fn open_issue(api: ApiClient, issue: &Issue) -> AppResult<Self> {
        Self::open(api, DocumentDraft::from_issue(issue)).await
    }

    async fn open(api: ApiClient, draft: DocumentDraft) -> AppResult<Self> {
        let (materials, warehouses, suppliers, clients, stock) = tokio::try_join!(
            api.materials(),
            api.warehouses(),
            api.suppliers(),
            api.clients(),
            api.stock_current(),
        )?;
        tracing::debug!(
            kind = ?draft.kind,
            materials = materials.len(),
            stock_rows = stock.len(),
            "document editor opened"
        );
        Ok(Self {
            api,
            draft,
            materials,
            warehouses,
            suppliers,
            clients,
            availability: AvailabilityIndex::from_stock(&stock),
        })
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn warehouses(&self) -> &[Warehouse] {
        &self.warehouses
    }

    /// Counterparties valid for this draft's kind
    pub fn supplier_choices(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn client_choices(&self) -> &[Client] {
        &self.clients
    }

    pub fn set_field(&mut self, field: DocumentField, value: impl Into<String>) {
        self.draft.set_field(field, value);
    }

    pub fn set_line_field(&mut self, index: usize, patch: LinePatch) {
        self.draft
            .set_line_field(index, patch, &self.materials, &self.availability);
    }

    pub fn add_line(&mut self) {
        self.draft.add_line();
    }

    pub fn remove_line(&mut self, index: usize) {
        self.draft.remove_line(index);
    }

    pub fn total(&self) -> Decimal {
        self.draft.compute_total()
    }

    /// Materials offered in one line's selector, per the draft's rules
    pub fn selectable_materials(&self, index: usize) -> Vec<SelectableMaterial<'_>> {
        self.draft
            .selectable_materials(index, &self.materials, &self.availability)
    }

    /// Advisory over-availability warnings; never block submission
    pub fn availability_warnings(&self) -> Vec<AvailabilityWarning> {
        self.draft.availability_warnings(&self.availability)
    }

    /// Re-fetch current stock, e.g. after another user posted a document
    pub async fn refresh_stock(&mut self) -> AppResult<()> {
        let stock = self.api.stock_current().await?;
        self.availability = AvailabilityIndex::from_stock(&stock);
        Ok(())
    }

    /// Validate the draft and send it. On any error the draft stays
    /// untouched in the editor.
    pub async fn submit(&self) -> AppResult<SubmitOutcome> {
        let payload = self.draft.build_payload()?;
        payload
            .validate()
            .map_err(|e| AppError::InvalidPayload(e.to_string()))?;

        let outcome = match (self.draft.kind, self.draft.identity) {
            (DocumentKind::Receipt, DocumentIdentity::New) => {
                SubmitOutcome::Created(self.api.create_receipt(&payload).await?.id)
            }
            (DocumentKind::Receipt, DocumentIdentity::Existing(id)) => {
                SubmitOutcome::Updated(self.api.update_receipt(id, &payload).await?.id)
            }
            (DocumentKind::Issue, DocumentIdentity::New) => {
                SubmitOutcome::Created(self.api.create_issue(&payload).await?.id)
            }
            (DocumentKind::Issue, DocumentIdentity::Existing(id)) => {
                SubmitOutcome::Updated(self.api.update_issue(id, &payload).await?.id)
            }
        };
        tracing::info!(kind = ?self.draft.kind, id = outcome.document_id(), "document saved");
        Ok(outcome)
    }
}
