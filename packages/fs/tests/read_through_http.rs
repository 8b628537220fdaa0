use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use httpfuse_fs::{FsError, FsOptions, HttpFs};
use httpfuse_http::ReqwestFetcher;
use httpfuse_tree::ResourceTree;

fn tree_for(uri: &str) -> ResourceTree {
    let json = format!(
        r#"{{
            "type": "directory",
            "contents": {{
                "dir": {{
                    "type": "directory",
                    "contents": {{
                        "testfile": {{
                            "type": "file",
                            "url": "{uri}/objects/testfile",
                            "stat": {{"st_size": 1000}}
                        }},
                        "missing": {{
                            "type": "file",
                            "url": "{uri}/objects/missing",
                            "stat": {{"st_size": 10}}
                        }}
                    }}
                }}
            }}
        }}"#
    );
    ResourceTree::from_json_str(&json).unwrap()
}

fn mount_for(uri: &str) -> HttpFs<ReqwestFetcher> {
    HttpFs::new(
        tree_for(uri),
        FsOptions::default(),
        ReqwestFetcher::with_default_timeout().unwrap(),
    )
}

#[tokio::test]
async fn test_read_fetches_one_range() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objects/testfile"))
        .and(header("Range", "bytes=200-299"))
        .respond_with(ResponseTemplate::new(206).set_body_bytes(vec![b'a'; 100]))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();

    let data = tokio::task::spawn_blocking(move || {
        let fs = mount_for(&uri);
        let fh = fs.open("/dir/testfile", libc::O_RDONLY).unwrap();
        let data = fs.read("/dir/testfile", 100, 200, fh).unwrap();
        fs.release("/dir/testfile", fh);
        data
    })
    .await
    .unwrap();

    assert_eq!(data.len(), 100);
    assert!(data.iter().all(|b| *b == b'a'));
}

#[tokio::test]
async fn test_overlong_200_is_truncated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objects/testfile"))
        .respond_with(ResponseTemplate::new(200).set_body_string("the whole object body"))
        .mount(&server)
        .await;

    let uri = server.uri();

    let data = tokio::task::spawn_blocking(move || {
        let fs = mount_for(&uri);
        fs.read("/dir/testfile", 9, 0, 0).unwrap()
    })
    .await
    .unwrap();

    assert_eq!(&data[..], b"the whole");
}

#[tokio::test]
async fn test_upstream_404_is_io_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objects/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("NoSuchKey"))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();

    let result = tokio::task::spawn_blocking(move || {
        let fs = mount_for(&uri);
        fs.read("/dir/missing", 10, 0, 0)
    })
    .await
    .unwrap();

    assert_eq!(result, Err(FsError::Io));
}

#[tokio::test]
async fn test_read_past_end_416_is_io_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objects/testfile"))
        .and(header("Range", "bytes=1000-1099"))
        .respond_with(ResponseTemplate::new(416))
        .mount(&server)
        .await;

    let uri = server.uri();

    let result = tokio::task::spawn_blocking(move || {
        let fs = mount_for(&uri);
        fs.read("/dir/testfile", 100, 1000, 0)
    })
    .await
    .unwrap();

    assert_eq!(result, Err(FsError::Io));
}

#[tokio::test]
async fn test_metadata_operations_make_no_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let uri = server.uri();

    let listing = tokio::task::spawn_blocking(move || {
        let fs = mount_for(&uri);
        let st = fs.getattr("/dir/testfile").unwrap();
        assert_eq!(st.size, 1000);
        assert_eq!(st.blocks, 1);
        let fh = fs.open("/dir/testfile", libc::O_RDONLY).unwrap();
        fs.release("/dir/testfile", fh);
        fs.readdir("/dir", 0).unwrap()
    })
    .await
    .unwrap();

    assert_eq!(listing, vec![".", "..", "missing", "testfile"]);
}
