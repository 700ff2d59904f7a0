/// 请求头集合
///
/// 有序的多值映射：键比较不区分大小写，同名请求头按插入顺序保留为多条记录，
/// 不会相互覆盖。每条记录保留自己书写时的大小写。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条请求头（同名不覆盖）
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// 第一个匹配的值
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).next()
    }

    /// 所有匹配的值，按插入顺序
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// 对每个值做变换，名称和条数保持不变
    pub fn map_values<F>(&self, mut f: F) -> Headers
    where
        F: FnMut(&str) -> String,
    {
        Headers {
            entries: self
                .entries
                .iter()
                .map(|(key, value)| (key.clone(), f(value)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (key, value) in iter {
            headers.append(key, value);
        }
        headers
    }
}
