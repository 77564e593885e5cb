//! Bounded Content Fetcher
//!
//! Fans out file content fetches through a bounded worker pool instead of
//! issuing one request per path all at once. Individual failures are
//! logged and dropped; the successes come back in input order.

use futures::stream::{self, StreamExt};
use tracing::warn;

use super::client::GithubClient;
use crate::types::{FileEntry, RepositoryRef};

/// Fetch the given paths with at most `concurrency` requests in flight.
///
/// Paths whose fetch fails are skipped; the remaining entries preserve
/// the order of `paths`.
pub async fn fetch_contents(
    client: &GithubClient,
    repo: &RepositoryRef,
    paths: &[String],
    concurrency: usize,
) -> Vec<FileEntry> {
    let mut fetched: Vec<(usize, FileEntry)> = stream::iter(paths.iter().cloned().enumerate())
        .map(|(index, path)| async move {
            match client.get_content(repo, &path).await {
                Ok(entry) => Some((index, entry)),
                Err(e) => {
                    warn!(path = %path, error = %e, "Skipping file after fetch failure");
                    None
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .filter_map(|result| async move { result })
        .collect()
        .await;

    fetched.sort_by_key(|(index, _)| *index);
    fetched.into_iter().map(|(_, entry)| entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GithubConfig;

    fn test_client(server: &mockito::Server) -> GithubClient {
        let config = GithubConfig {
            token: Some("ghp_test".to_string()),
            api_base: server.url(),
            ..Default::default()
        };
        GithubClient::new(&config).unwrap()
    }

    fn content_body(text: &str) -> String {
        use base64::Engine;
        serde_json::json!({
            "content": base64::engine::general_purpose::STANDARD.encode(text),
            "size": text.len(),
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_fetch_preserves_input_order() {
        let mut server = mockito::Server::new_async().await;
        for (path, text) in [("a.js", "aaa"), ("b.js", "bbb"), ("c.js", "ccc")] {
            server
                .mock(
                    "GET",
                    format!("/repos/octocat/hello-world/contents/{}", path).as_str(),
                )
                .with_status(200)
                .with_body(content_body(text))
                .create_async()
                .await;
        }

        let client = test_client(&server);
        let repo = RepositoryRef::new("octocat", "hello-world");
        let paths: Vec<String> = ["a.js", "b.js", "c.js"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let files = fetch_contents(&client, &repo, &paths, 2).await;
        let got: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(got, vec!["a.js", "b.js", "c.js"]);
        assert_eq!(files[1].content, "bbb");
    }

    #[tokio::test]
    async fn test_failures_dropped_not_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octocat/hello-world/contents/ok.js")
            .with_status(200)
            .with_body(content_body("fine"))
            .create_async()
            .await;
        server
            .mock("GET", "/repos/octocat/hello-world/contents/gone.js")
            .with_status(404)
            .with_body("{}")
            .create_async()
            .await;

        let client = test_client(&server);
        let repo = RepositoryRef::new("octocat", "hello-world");
        let paths = vec!["gone.js".to_string(), "ok.js".to_string()];

        let files = fetch_contents(&client, &repo, &paths, 5).await;
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "ok.js");
    }
}
