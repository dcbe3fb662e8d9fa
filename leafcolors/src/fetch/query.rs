use crate::foundation::error::{LeafError, LeafResult};
use reqwest::Url;

const PAGE_KEY: &str = "page";
const PER_PAGE_KEY: &str = "per_page";

/// A paginated API query whose `page` parameter can be rewritten.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageQuery {
    url: Url,
    page: u32,
    per_page: u32,
}

impl PageQuery {
    /// Parse `url` and check that it carries positive integer `page` and `per_page` parameters.
    pub fn parse(url: &str) -> LeafResult<Self> {
        let url = Url::parse(url).map_err(|e| LeafError::config(format!("bad query url: {e}")))?;
        let per_page = positive_param(&url, PER_PAGE_KEY)?;
        let page = positive_param(&url, PAGE_KEY)?;
        Ok(Self {
            url,
            page,
            per_page,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Page the query was written with.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// The query URL with `page` set to `p`. Every other parameter is kept byte for byte, in place.
    pub fn with_page(&self, p: u32) -> LeafResult<Url> {
        if p < 1 {
            return Err(LeafError::config("page number must be greater than 0"));
        }
        let query = self
            .url
            .query()
            .unwrap_or_default()
            .split('&')
            .map(|seg| {
                let key = seg.split_once('=').map_or(seg, |(k, _)| k);
                if key == PAGE_KEY {
                    format!("{PAGE_KEY}={p}")
                } else {
                    seg.to_owned()
                }
            })
            .collect::<Vec<_>>()
            .join("&");

        let mut url = self.url.clone();
        url.set_query(Some(&query));
        Ok(url)
    }
}

fn positive_param(url: &Url, key: &str) -> LeafResult<u32> {
    let raw = url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| {
            LeafError::config(format!("GET request url needs a {key} parameter"))
        })?;
    match raw.parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(LeafError::config(format!(
            "{key} must be a positive integer, got \"{raw}\""
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/query.rs"]
mod tests;
