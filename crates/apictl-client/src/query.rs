//! Query-string options for collection listing.

use std::collections::BTreeMap;

use url::Url;

use crate::error::{ClientError, ClientResult};

/// Pagination, filtering, sorting, inclusion, and sparse fieldsets for `list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// `page[key]=value` pairs (`number`, `size`, ...).
    pub page: BTreeMap<String, String>,
    /// `filter[field]=value` pairs.
    pub filter: BTreeMap<String, String>,
    /// Comma-joined sort fields; a leading `-` sorts descending.
    pub sort: Option<String>,
    /// Comma-joined relation names to side-load.
    pub include: Option<String>,
    /// `fields[type]=f1,f2` sparse fieldsets.
    pub fields: BTreeMap<String, String>,
}

impl ListOptions {
    /// Set `page[key]`.
    #[must_use]
    pub fn with_page(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.page.insert(key.into(), value.into());
        self
    }

    /// Parse `field:value,field2:value2` into filter pairs.
    ///
    /// Only the first `:` separates a pair, so values may contain colons.
    pub fn parse_filter(expr: &str) -> ClientResult<BTreeMap<String, String>> {
        let mut filter = BTreeMap::new();
        for entry in expr.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let (field, value) = entry.split_once(':').ok_or_else(|| {
                ClientError::validation(format!("filter entry '{entry}' must be field:value"))
            })?;
            let field = field.trim();
            if field.is_empty() {
                return Err(ClientError::validation(format!(
                    "filter entry '{entry}' has an empty field name"
                )));
            }
            filter.insert(field.to_string(), value.trim().to_string());
        }
        Ok(filter)
    }

    /// Parse `type:f1,f2;type2:f3` into sparse fieldsets.
    pub fn parse_fields(expr: &str) -> ClientResult<BTreeMap<String, String>> {
        let mut fields = BTreeMap::new();
        for entry in expr.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
            let (kind, list) = entry.split_once(':').ok_or_else(|| {
                ClientError::validation(format!("fields entry '{entry}' must be type:field,..."))
            })?;
            let kind = kind.trim();
            if kind.is_empty() {
                return Err(ClientError::validation(format!(
                    "fields entry '{entry}' has an empty type"
                )));
            }
            let list = list
                .split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .collect::<Vec<_>>()
                .join(",");
            fields.insert(kind.to_string(), list);
        }
        Ok(fields)
    }

    /// Query pairs in emission order, before URL encoding.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        pairs.extend(
            self.page
                .iter()
                .map(|(key, value)| (format!("page[{key}]"), value.clone())),
        );
        pairs.extend(
            self.filter
                .iter()
                .map(|(field, value)| (format!("filter[{field}]"), value.clone())),
        );
        if let Some(sort) = self.sort.as_deref().filter(|sort| !sort.is_empty()) {
            pairs.push(("sort".to_string(), sort.to_string()));
        }
        if let Some(include) = self.include.as_deref().filter(|include| !include.is_empty()) {
            pairs.push(("include".to_string(), include.to_string()));
        }
        pairs.extend(
            self.fields
                .iter()
                .map(|(kind, list)| (format!("fields[{kind}]"), list.clone())),
        );
        pairs
    }

    /// Append the encoded pairs to `url`; a URL without pairs gets no `?`.
    pub(crate) fn apply(&self, url: &mut Url) {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return;
        }
        let mut query = url.query_pairs_mut();
        for (key, value) in &pairs {
            query.append_pair(key, value);
        }
    }
}
