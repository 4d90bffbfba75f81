pub mod format;
pub mod pagination;

pub use format::{
    cents_to_dollars, dollars_to_cents, exponent_in_range, format_currency, format_date,
    format_date_to_local, generate_y_axis, YAxis,
};
pub use pagination::{
    generate_pagination, page_offset, parse_page, total_pages, PageToken, ITEMS_PER_PAGE,
};
