use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ESearchResult {
    #[serde(default)]
    pub esearchresult: ESearchData,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ESearchData {
    /// Absent when the query matched nothing
    #[serde(default)]
    pub idlist: Vec<String>,
}
