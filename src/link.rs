pub const DATA_PARAM: &str = "data";

pub fn build_share_link(base_url: &str, token: &str) -> String {
    let sep = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{sep}{DATA_PARAM}={token}")
}

/// Value of the `data` query parameter, if the text looks like a link that
/// carries one.
pub fn extract_data_param(text: &str) -> Option<&str> {
    let text = text.trim();
    let query_start = text.find('?')? + 1;
    let query = &text[query_start..];
    let query = query.split('#').next().unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == DATA_PARAM).then_some(value)
    })
}
