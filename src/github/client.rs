use super::requests::{close_requests, CreateCheckRun, CreatedCheckRun};
use super::{CheckRunId, CheckRuns};
use crate::error::{CheckError, Result};
use crate::types::annotation::CheckRunOutput;
use crate::types::config::{Repository, RunConfig, Token};
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, ClientBuilder, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use tracing::debug;

pub const PREVIEW_ACCEPT: &str = "application/vnd.github.antiope-preview+json, application/json";

pub struct GithubCheckRuns {
    client: Client,
    api_url: String,
    repository: Repository,
    token: Token,
    check_name: String,
    max_annotations_per_request: usize,
}

impl GithubCheckRuns {
    pub fn new(config: &RunConfig) -> Result<Self> {
        Self::with_builder(config, Client::builder())
    }

    fn with_builder(config: &RunConfig, builder: ClientBuilder) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(PREVIEW_ACCEPT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("rubocop-check/", env!("CARGO_PKG_VERSION"))),
        );
        let client = builder.default_headers(headers).build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            repository: config.repository.clone(),
            token: config.token.clone(),
            check_name: config.check_name.clone(),
            max_annotations_per_request: config.max_annotations_per_request,
        })
    }

    fn check_runs_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/check-runs",
            self.api_url, self.repository.owner, self.repository.name
        )
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.bearer_auth(self.token.expose()).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CheckError::RemoteApi {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

impl CheckRuns for GithubCheckRuns {
    fn create(&self, head_sha: &str, started_at: DateTime<Utc>) -> Result<CheckRunId> {
        let body = CreateCheckRun::in_progress(&self.check_name, head_sha, started_at);
        let url = self.check_runs_url();
        debug!(%url, head_sha, "creating check run");
        let created: CreatedCheckRun = self.send(self.client.post(&url).json(&body))?.json()?;
        Ok(CheckRunId(created.id))
    }

    fn close(&self, id: CheckRunId, output: &CheckRunOutput) -> Result<()> {
        let url = format!("{}/{}", self.check_runs_url(), id);
        let requests = close_requests(output, self.max_annotations_per_request, Utc::now());
        let total = requests.len();
        for (index, body) in requests.iter().enumerate() {
            debug!(
                %url,
                request = index + 1,
                total,
                annotations = body.output.annotations.len(),
                "updating check run"
            );
            self.send(self.client.patch(&url).json(body))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::annotation::{Annotation, AnnotationLevel, Conclusion};
    use crate::types::config::MAX_ANNOTATIONS_PER_REQUEST;
    use std::collections::HashMap;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    struct RecordedRequest {
        request_line: String,
        headers: HashMap<String, String>,
        body: serde_json::Value,
    }

    /// Serve one canned response per connection, recording each request.
    fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<RecordedRequest>>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
        let url = format!(
            "http://{}",
            listener.local_addr().expect("listener should have an address")
        );
        let handle = thread::spawn(move || {
            responses
                .into_iter()
                .map(|(status, body)| {
                    let (mut stream, _) = listener.accept().expect("client should connect");
                    let recorded = read_request(&mut stream);
                    let response = format!(
                        "HTTP/1.1 {status} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    stream
                        .write_all(response.as_bytes())
                        .expect("response should write");
                    recorded
                })
                .collect()
        });
        (url, handle)
    }

    fn read_request(stream: &mut TcpStream) -> RecordedRequest {
        let mut reader = BufReader::new(stream);
        let mut request_line = String::new();
        reader
            .read_line(&mut request_line)
            .expect("request line should read");

        let mut headers = HashMap::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("header should read");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
            }
        }

        let length = headers
            .get("content-length")
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(0);
        let mut body = vec![0; length];
        reader.read_exact(&mut body).expect("body should read");

        RecordedRequest {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: if body.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::from_slice(&body).expect("body should be json")
            },
        }
    }

    fn config(api_url: &str, max_annotations_per_request: usize) -> RunConfig {
        RunConfig {
            check_name: "Rubocop".to_string(),
            api_url: api_url.to_string(),
            repository: Repository::parse("octo/widgets").expect("slug should parse"),
            commit_sha: "abc123".to_string(),
            token: Token::new("ghs_token"),
            linter: "rubocop".to_string(),
            linter_args: Vec::new(),
            git: "git".to_string(),
            changes: None,
            max_annotations_per_request,
        }
    }

    fn client_for(api_url: &str, max_annotations_per_request: usize) -> GithubCheckRuns {
        GithubCheckRuns::with_builder(
            &config(api_url, max_annotations_per_request),
            Client::builder().no_proxy(),
        )
        .expect("client should build")
    }

    fn output_with(count: u32) -> CheckRunOutput {
        CheckRunOutput {
            conclusion: Conclusion::Failure,
            title: "Rubocop".to_string(),
            summary: format!("Found {count} offense(s) in 1 inspected file(s)."),
            annotations: (1..=count)
                .map(|line| Annotation {
                    path: "a.rb".to_string(),
                    start_line: line,
                    end_line: line,
                    annotation_level: AnnotationLevel::Failure,
                    title: "Style/X".to_string(),
                    message: "m".to_string(),
                    start_column: None,
                    end_column: None,
                })
                .collect(),
        }
    }

    #[test]
    fn check_runs_url_is_repository_scoped() {
        let client = client_for("https://api.github.com/", MAX_ANNOTATIONS_PER_REQUEST);
        assert_eq!(
            client.check_runs_url(),
            "https://api.github.com/repos/octo/widgets/check-runs"
        );
    }

    #[test]
    fn create_posts_in_progress_run_and_returns_id() {
        let (url, server) = serve(vec![(201, r#"{"id":77,"status":"in_progress"}"#)]);
        let client = client_for(&url, MAX_ANNOTATIONS_PER_REQUEST);

        let id = client
            .create("abc123", Utc::now())
            .expect("create should succeed");
        assert_eq!(id, CheckRunId(77));

        let requests = server.join().expect("server thread should finish");
        let request = &requests[0];
        assert_eq!(
            request.request_line,
            "POST /repos/octo/widgets/check-runs HTTP/1.1"
        );
        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Bearer ghs_token")
        );
        assert_eq!(
            request.headers.get("accept").map(String::as_str),
            Some(PREVIEW_ACCEPT)
        );
        assert!(request
            .headers
            .get("user-agent")
            .is_some_and(|agent| agent.starts_with("rubocop-check/")));
        assert_eq!(request.body["name"], "Rubocop");
        assert_eq!(request.body["status"], "in_progress");
        assert_eq!(request.body["head_sha"], "abc123");
        assert!(request.body["started_at"]
            .as_str()
            .is_some_and(|at| at.ends_with('Z')));
    }

    #[test]
    fn create_rejection_maps_to_remote_api_error() {
        let (url, server) = serve(vec![(403, "forbidden")]);
        let client = client_for(&url, MAX_ANNOTATIONS_PER_REQUEST);

        let err = client
            .create("abc123", Utc::now())
            .expect_err("403 should fail");
        assert!(
            matches!(&err, CheckError::RemoteApi { status: 403, body } if body.as_str() == "forbidden"),
            "unexpected error: {err}"
        );
        server.join().expect("server thread should finish");
    }

    #[test]
    fn close_sends_chunked_patches_to_run_url() {
        let (url, server) = serve(vec![(200, "{}"), (200, "{}"), (200, "{}")]);
        let client = client_for(&url, 2);

        client
            .close(CheckRunId(77), &output_with(5))
            .expect("close should succeed");

        let requests = server.join().expect("server thread should finish");
        assert_eq!(requests.len(), 3);
        for request in &requests {
            assert_eq!(
                request.request_line,
                "PATCH /repos/octo/widgets/check-runs/77 HTTP/1.1"
            );
            assert_eq!(
                request.headers.get("authorization").map(String::as_str),
                Some("Bearer ghs_token")
            );
        }
        let sizes: Vec<_> = requests
            .iter()
            .map(|r| r.body["output"]["annotations"].as_array().map_or(0, Vec::len))
            .collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert!(requests[0].body.get("conclusion").is_none());
        assert!(requests[1].body.get("conclusion").is_none());
        assert_eq!(requests[2].body["conclusion"], "failure");
        assert_eq!(requests[2].body["output"]["title"], "Rubocop");
    }

    #[test]
    fn close_stops_at_first_rejected_patch() {
        let (url, server) = serve(vec![(422, "bad")]);
        let client = client_for(&url, 2);

        let err = client
            .close(CheckRunId(77), &output_with(5))
            .expect_err("422 should fail");
        assert_eq!(err.to_string(), "check-run api returned 422: bad");

        let requests = server.join().expect("server thread should finish");
        assert_eq!(requests.len(), 1);
    }

    #[test]
    fn unreachable_api_is_a_transport_error() {
        let client = client_for("http://127.0.0.1:9", MAX_ANNOTATIONS_PER_REQUEST);
        let err = client
            .create("abc123", Utc::now())
            .expect_err("nothing listens on the discard port");
        assert!(matches!(err, CheckError::Http(_)));
    }
}
