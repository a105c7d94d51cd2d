// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jenkins URL helpers.
//!
//! Tracked URLs are the primary key of the job map, so every URL entering
//! the system goes through [`normalize_url`] first.

const JOB_SEGMENT: &str = "/job/";

/// Percent-decode a URL, keeping the raw text when it is not valid UTF-8.
pub fn decode(url: &str) -> String {
    match urlencoding::decode(url) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => url.to_string(),
    }
}

/// Canonical form of a tracked URL: trimmed, decoded, with a trailing slash.
pub fn normalize_url(raw: &str) -> String {
    let mut url = decode(raw.trim());
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Whether the text looks like an http(s) URL with something after the scheme.
pub fn is_http_url(raw: &str) -> bool {
    let raw = raw.trim();
    ["http://", "https://"]
        .iter()
        .any(|scheme| raw.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()))
}

/// Name derived from the last non-empty `/job/<name>` segment.
///
/// Falls back to the whole decoded URL when there is no job segment.
pub fn default_name(url: &str) -> String {
    for (idx, _) in url.rmatch_indices(JOB_SEGMENT) {
        let rest = &url[idx + JOB_SEGMENT.len()..];
        let name = rest.split('/').next().unwrap_or_default();
        if !name.is_empty() {
            return decode(name);
        }
    }
    decode(url)
}

/// Key of a job relative to its parent view.
///
/// `http://ci/job/folder/job/app/` becomes `folder/app`. Both the JSON API
/// and the build-history feed go through this, so their entries line up.
pub fn sub_job_key(url: &str) -> String {
    let relative = url
        .match_indices(JOB_SEGMENT)
        .find(|(idx, _)| *idx > 0)
        .map(|(idx, _)| &url[idx + JOB_SEGMENT.len()..])
        .and_then(|rest| rest.strip_suffix('/'))
        .filter(|path| !path.is_empty())
        .unwrap_or(url);
    relative.replace(JOB_SEGMENT, "/")
}

/// Reduce a build or console page URL to the job that owns it.
///
/// `http://ci/job/a/job/b/42/console` becomes `http://ci/job/a/job/b/`.
/// Returns `None` when the URL has no job segment.
pub fn job_base_url(page_url: &str) -> Option<String> {
    page_url.rmatch_indices(JOB_SEGMENT).find_map(|(idx, _)| {
        let name_start = idx + JOB_SEGMENT.len();
        let name = page_url[name_start..].split('/').next().unwrap_or_default();
        if name.is_empty() {
            return None;
        }
        Some(format!("{}/", &page_url[..name_start + name.len()]))
    })
}

#[cfg(test)]
#[path = "url_tests.rs"]
mod tests;
