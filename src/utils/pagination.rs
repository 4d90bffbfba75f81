use serde::{Serialize, Serializer};

/// 每页发票数
pub const ITEMS_PER_PAGE: u32 = 6;

/// 分页控件上的一个位置: 页码或省略号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(u32),
    Ellipsis,
}

impl Serialize for PageToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(n) => serializer.serialize_u32(*n),
            Self::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// 生成分页窗口, 例如 `[1, 2, 3, "...", 9, 10]`
///
/// 总页数为 0 时返回空序列.
pub fn generate_pagination(current_page: u32, total_pages: u32) -> Vec<PageToken> {
    use PageToken::{Ellipsis, Page};

    if total_pages <= 7 {
        return (1..=total_pages).map(Page).collect();
    }

    if current_page <= 3 {
        return vec![
            Page(1),
            Page(2),
            Page(3),
            Ellipsis,
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    if current_page >= total_pages - 2 {
        return vec![
            Page(1),
            Page(2),
            Ellipsis,
            Page(total_pages - 2),
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current_page - 1),
        Page(current_page),
        Page(current_page + 1),
        Ellipsis,
        Page(total_pages),
    ]
}

/// ceil(count / page_size); 没有匹配行时为 0 页
pub fn total_pages(count: i64, page_size: u32) -> u32 {
    if count <= 0 || page_size == 0 {
        return 0;
    }
    let size = i64::from(page_size);
    u32::try_from((count + size - 1) / size).unwrap_or(u32::MAX)
}

/// 1 起始页码对应的 OFFSET
pub fn page_offset(page: u32, page_size: u32) -> i64 {
    i64::from(page.max(1) - 1) * i64::from(page_size)
}

/// 查询串中的页码; 缺失、无法解析或小于 1 时按第 1 页处理
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}
