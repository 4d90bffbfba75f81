pub mod customer;
pub mod invoice;
pub mod revenue;
pub mod user;
pub mod view;

pub use customer::{Customer, CustomerField, CustomerTableRow};
pub use invoice::{
    CardMetrics, Invoice, InvoiceDraft, InvoiceEditView, InvoiceRecord, InvoiceStatus,
    InvoiceTableRow, LatestInvoiceRow, NewInvoice,
};
pub use revenue::{sort_by_month, Revenue};
pub use user::User;
pub use view::{
    CardData, CustomerRow, CustomersPage, DashboardOverview, InvoiceFormPage, InvoiceRow,
    InvoicesPage, LatestInvoice, RevenueChart,
};
