use dashmap::DashMap;

/// 写入后的缓存失效钩子, 与具体 web 框架解耦
pub trait Revalidator: Send + Sync {
    fn revalidate(&self, path: &str);

    /// 某路径当前的修订号, 从未失效过时为 0
    fn revision(&self, path: &str) -> u64;
}

/// 按路径记录修订号的默认实现
#[derive(Debug, Default)]
pub struct PathRevalidator {
    revisions: DashMap<String, u64>,
}

impl PathRevalidator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Revalidator for PathRevalidator {
    fn revalidate(&self, path: &str) {
        let mut entry = self.revisions.entry(path.to_string()).or_insert(0);
        *entry += 1;
        tracing::debug!("Revalidated {} (revision {})", path, *entry);
    }

    fn revision(&self, path: &str) -> u64 {
        self.revisions.get(path).map(|r| *r).unwrap_or(0)
    }
}
