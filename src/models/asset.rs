use std::fmt::{self, Display};

/// 图片检索键：`<storeId>#<sku>`
///
/// 每件商品生成一个（数量为 3 的订单行会生成 3 个相同的键），
/// 对应需要打印的每一张标签。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey(String);

impl SearchKey {
    pub fn new(store_id: i64, sku: &str) -> Self {
        Self(format!("{}#{}", store_id, sku))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SearchKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// 云盘上找到的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedAsset {
    pub file_id: String,
    pub file_name: String,
}

impl LocatedAsset {
    pub fn new(file_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            file_name: file_name.into(),
        }
    }
}

/// 输出 `fileId#fileName` 组合形式
impl Display for LocatedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.file_id, self.file_name)
    }
}

/// 一个检索键及其搜索结果
///
/// 结果始终与来源键绑定，下载阶段不依赖列表下标对齐。
#[derive(Debug, Clone)]
pub struct KeyMatches {
    /// 键在本次运行中的生成序号（从 1 开始）
    pub position: usize,
    pub key: SearchKey,
    pub matches: Vec<LocatedAsset>,
    /// 搜索失败时的错误信息
    pub search_error: Option<String>,
}

impl KeyMatches {
    /// 下载阶段只使用第一个匹配
    pub fn first_match(&self) -> Option<&LocatedAsset> {
        self.matches.first()
    }

    pub fn is_failed(&self) -> bool {
        self.search_error.is_some()
    }
}
