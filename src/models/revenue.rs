use chrono::Month;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 月度收入 (revenue)
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Revenue {
    pub month: String,
    pub revenue: i32,
}

impl Revenue {
    pub fn new(month: impl Into<String>, revenue: i32) -> Self {
        Self {
            month: month.into(),
            revenue,
        }
    }

    /// 月份缩写 ("Jan") 对应的 1-12; 无法识别时为 None
    pub fn month_number(&self) -> Option<u32> {
        self.month.parse::<Month>().ok().map(|m| m.number_from_month())
    }
}

/// 按日历月份排序, 无法识别的月份排在最后
pub fn sort_by_month(revenue: &mut [Revenue]) {
    revenue.sort_by_key(|r| r.month_number().unwrap_or(u32::MAX));
}
