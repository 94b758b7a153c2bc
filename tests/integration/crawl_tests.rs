//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch, extract and assemble cycle end-to-end.

use site_binder::config::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use site_binder::crawler::{run_crawl, Crawler, FetchError, HttpTransport, TraversalStrategy};
use site_binder::output::{assemble, write_document};
use site_binder::{BinderError, CrawlError};
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: Some("https://example.com/about".to_string()),
    }
}

fn crawler(concurrency: usize) -> Crawler {
    let transport = HttpTransport::new(
        &user_agent(),
        &CrawlerConfig {
            max_concurrent_fetches: concurrency,
            request_timeout_secs: 5,
        },
    )
    .expect("Failed to build HTTP client");
    Crawler::new(Arc::new(transport)).with_concurrency(concurrency)
}

fn index(id: &str) -> TraversalStrategy {
    TraversalStrategy::IndexEnumeration {
        container_id: id.to_string(),
    }
}

fn chain(class: &str) -> TraversalStrategy {
    TraversalStrategy::NextLinkChain {
        next_class: class.to_string(),
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>Test</title></head><body>{}</body></html>",
            body
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

fn start_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).expect("Failed to parse base URL")
}

#[tokio::test]
async fn test_index_enumeration_skips_invalid_and_external_links() {
    let mock_server = MockServer::start().await;
    let other_host = MockServer::start().await;

    let toc = format!(
        r##"<div class="content"><h1>Home</h1></div>
        <div id="toc">
            <a href="/a">A</a>
            <a href="b">B</a>
            <a href="#intro">Intro</a>
            <a href="mailto:someone@example.com">Mail</a>
            <a href="javascript:void(0)">Script</a>
            <a href="{}/c">Elsewhere</a>
            <a href="/a#details">A again</a>
        </div>"##,
        other_host.uri()
    );

    mount_page(&mock_server, "/", &toc, 1).await;
    mount_page(
        &mock_server,
        "/a",
        r#"<div class="content"><p>Page A</p><img src="img/a.png"></div>"#,
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        r#"<div class="content"><p>Page B</p></div>"#,
        1,
    )
    .await;
    // Links to other hosts are never fetched
    mount_page(&other_host, "/c", r#"<div class="content">C</div>"#, 0).await;

    let start = start_url(&mock_server);
    let report = crawler(1)
        .run(&start, "content", &index("toc"))
        .await
        .expect("Crawl should succeed");

    let sources: Vec<&str> = report
        .fragments
        .iter()
        .map(|f| f.source_url.path())
        .collect();
    assert_eq!(sources, vec!["/", "/a", "/b"]);

    assert!(report.fragments[0].markup.contains("<h1>Home</h1>"));
    assert!(report.fragments[1]
        .markup
        .contains(&format!("src=\"{}/img/a.png\"", mock_server.uri())));

    assert_eq!(report.stats.fragments_extracted, 3);
    assert_eq!(report.stats.links_external, 1);
    assert_eq!(report.stats.links_invalid, 3);
    assert_eq!(report.stats.links_duplicate, 1);
}

#[tokio::test]
async fn test_index_enumeration_keeps_order_under_concurrency() {
    let mock_server = MockServer::start().await;

    let mut toc = String::from(r#"<div id="toc">"#);
    for i in 1..=6 {
        toc.push_str(&format!(r#"<a href="/p{}">P{}</a>"#, i, i));
    }
    toc.push_str("</div>");
    mount_page(&mock_server, "/", &toc, 1).await;

    for i in 1..=6u64 {
        // Earlier pages answer slower so completion order is reversed
        Mock::given(method("GET"))
            .and(path(format!("/p{}", i)))
            .respond_with(
                html(&format!(r#"<div class="content">P{}</div>"#, i))
                    .set_delay(std::time::Duration::from_millis(20 * (7 - i))),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let report = crawler(4)
        .run(&start_url(&mock_server), "content", &index("toc"))
        .await
        .expect("Crawl should succeed");

    let sources: Vec<String> = report
        .fragments
        .iter()
        .map(|f| f.source_url.path().to_string())
        .collect();
    assert_eq!(sources, vec!["/p1", "/p2", "/p3", "/p4", "/p5", "/p6"]);
    // The start page had no content region
    assert_eq!(report.stats.content_not_found, 1);
}

#[tokio::test]
async fn test_next_link_chain_stops_at_cycle() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<div class="content">One</div><a class="next" href="/two">Next</a>"#,
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/two",
        r#"<div class="content">Two</div><a class="next" href="three">Next</a>"#,
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/three",
        r#"<div class="content">Three</div><a class="nav next" href="/">Back to start</a>"#,
        1,
    )
    .await;

    let report = crawler(1)
        .run(&start_url(&mock_server), "content", &chain("next"))
        .await
        .expect("Crawl should succeed");

    let text: Vec<&str> = report.fragments.iter().map(|f| f.markup.as_str()).collect();
    assert_eq!(text.len(), 3);
    assert!(text[0].contains("One"));
    assert!(text[1].contains("Two"));
    assert!(text[2].contains("Three"));
}

#[tokio::test]
async fn test_next_link_chain_stops_at_external_link() {
    let mock_server = MockServer::start().await;
    let other_host = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<div class="content">Only</div><a class="next" href="{}/next">Next</a>"#,
            other_host.uri()
        ),
        1,
    )
    .await;
    mount_page(&other_host, "/next", r#"<div class="content">No</div>"#, 0).await;

    let report = crawler(1)
        .run(&start_url(&mock_server), "content", &chain("next"))
        .await
        .expect("Crawl should succeed");

    assert_eq!(report.fragments.len(), 1);
    assert_eq!(report.stats.links_external, 1);
}

#[tokio::test]
async fn test_unreachable_start_url_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = crawler(1)
        .run(&start_url(&mock_server), "content", &index("toc"))
        .await;

    match result {
        Err(CrawlError::StartUnreachable { source, .. }) => {
            assert!(matches!(source, FetchError::Status { status: 404, .. }));
        }
        other => panic!("expected StartUnreachable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_index_page_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<div id="toc"><a href="/broken">Broken</a><a href="/ok">Ok</a></div>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", r#"<div class="content">Fine</div>"#, 1).await;

    let report = crawler(1)
        .run(&start_url(&mock_server), "content", &index("toc"))
        .await
        .expect("Crawl should succeed");

    assert_eq!(report.fragments.len(), 1);
    assert_eq!(report.fragments[0].source_url.path(), "/ok");
    assert_eq!(report.stats.fetch_failures, 1);
    assert_eq!(report.stats.content_not_found, 1);
}

#[tokio::test]
async fn test_missing_index_container_is_fatal() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<div class="content">Home</div><div id="other"></div>"#,
        1,
    )
    .await;

    let result = crawler(1)
        .run(&start_url(&mock_server), "content", &index("toc"))
        .await;

    assert!(matches!(
        result,
        Err(CrawlError::IndexContainerNotFound { .. })
    ));
}

#[tokio::test]
async fn test_percentage_sizing_is_stripped() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<div class="content" style="width: 80%; color: red">
            <table width="100%" border="1"><tr><td height="50%">Cell</td></tr></table>
            <a class="next" href="/end">End</a>
        </div>"#,
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/end",
        r#"<div class="content"><p style="width: 50%">Last</p></div>"#,
        1,
    )
    .await;

    let report = crawler(1)
        .run(&start_url(&mock_server), "content", &chain("next"))
        .await
        .expect("Crawl should succeed");

    let first = &report.fragments[0].markup;
    assert!(first.contains(r#"style="color: red""#));
    assert!(first.contains(r#"border="1""#));
    assert!(!first.contains('%'));

    let last = &report.fragments[1].markup;
    assert!(last.contains("<p>Last</p>"));
}

fn latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u32 as u8).collect()
}

#[tokio::test]
async fn test_latin1_pages_are_decoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(latin1(
                    "<html><body><div class=\"content\"><p>Caf\u{e9} cr\u{e8}me</p><a class=\"next\" href=\"/meta\">next</a></div></body></html>",
                ))
                .insert_header("content-type", "text/html; charset=iso-8859-1"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    // Charset declared only in the document itself
    Mock::given(method("GET"))
        .and(path("/meta"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(latin1(
                    "<html><head><meta charset=\"ISO-8859-1\"></head><body><div class=\"content\"><p>Gar\u{e7}on \u{bd}</p></div></body></html>",
                ))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = crawler(1)
        .run(&start_url(&mock_server), "content", &chain("next"))
        .await
        .expect("Crawl should succeed");

    assert_eq!(report.fragments.len(), 2);
    assert!(report.fragments[0]
        .markup
        .contains("<p>Caf\u{e9} cr\u{e8}me</p>"));
    assert!(report.fragments[1].markup.contains("<p>Gar\u{e7}on \u{bd}</p>"));
    assert!(!report.fragments[0].markup.contains('\u{fffd}'));

    let document = assemble(&report.fragments);
    assert!(document.contains("<meta charset=\"utf-8\">"));
    assert!(document.contains("Caf\u{e9}"));
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/about)",
        ))
        .respond_with(html(r#"<div class="content">Home</div><div id="toc"></div>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = crawler(1)
        .run(&start_url(&mock_server), "content", &index("toc"))
        .await
        .expect("Crawl should succeed");

    assert_eq!(report.fragments.len(), 1);
}

#[tokio::test]
async fn test_run_crawl_from_config_and_write_document() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();
    let output = dir.path().join("book.html");

    mount_page(
        &mock_server,
        "/",
        r#"<div class="content"><h1>Intro</h1></div><div id="toc"><a href="/one">1</a><a href="/two">2</a></div>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/one", r#"<div class="content"><h2>One</h2></div>"#, 1).await;
    mount_page(&mock_server, "/two", r#"<div class="content"><h2>Two</h2></div>"#, 1).await;

    let config = Config {
        site: SiteConfig {
            start_url: start_url(&mock_server).to_string(),
            content_class: "content".to_string(),
            index_id: Some("toc".to_string()),
            next_page_class: None,
        },
        crawler: CrawlerConfig {
            max_concurrent_fetches: 2,
            request_timeout_secs: 5,
        },
        user_agent: user_agent(),
        output: OutputConfig {
            filename: output.to_string_lossy().to_string(),
            title: "Bound Site".to_string(),
            render_command: None,
        },
    };

    let report = run_crawl(&config).await.expect("Crawl should succeed");
    assert_eq!(report.fragments.len(), 3);

    write_document(&report, &config.output).expect("Output should be written");
    let document = std::fs::read_to_string(&output).unwrap();

    assert!(document.contains("<title>Bound Site</title>"));
    let intro = document.find("Intro").unwrap();
    let one = document.find("One").unwrap();
    let two = document.find("Two").unwrap();
    assert!(intro < one && one < two);
    let fragments = report.into_fragments();
    assert_eq!(assemble(&fragments).matches("class=\"content\"").count(), 3);
}

#[tokio::test]
async fn test_run_crawl_rejects_missing_mode() {
    let config = Config {
        site: SiteConfig {
            start_url: "http://127.0.0.1:9/".to_string(),
            content_class: "content".to_string(),
            index_id: None,
            next_page_class: None,
        },
        ..Config::default()
    };

    let result = run_crawl(&config).await;
    assert!(matches!(result, Err(BinderError::Config(_))));
}
