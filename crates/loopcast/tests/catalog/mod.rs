use loopcast::{
    CachedDurationProvider, Catalog, LoopcastError, StaticDurationProvider,
};

use crate::{AssertWrapper, DURATIONS, PATHS};

fn provider() -> StaticDurationProvider {
    PATHS
        .iter()
        .map(|p| p.to_string())
        .zip(DURATIONS)
        .collect()
}

#[tokio::test]
async fn test_resolve_keeps_order() {
    let paths = [PATHS[2], PATHS[0], PATHS[1], PATHS[0]];
    let catalog = Catalog::resolve(&paths, &provider()).await.assert_success();

    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.paths().collect::<Vec<_>>(), paths.to_vec());
    assert_eq!(
        catalog
            .clips()
            .iter()
            .map(|c| c.duration_millis)
            .collect::<Vec<_>>(),
        vec![24936, 34469, 46738, 34469]
    );
    assert_eq!(catalog.cycle_duration_millis(), 24936 + 34469 + 46738 + 34469);
}

#[tokio::test]
async fn test_resolve_propagates_probe_failure() {
    let paths = [PATHS[0], "/missing.mp4"];
    let result = Catalog::resolve(&paths, &CachedDurationProvider::new(provider())).await;

    match result {
        Err(LoopcastError::ProbeFailure { path, .. }) => assert_eq!(path, "/missing.mp4"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_resolve_empty() {
    let paths: [&str; 0] = [];
    let result = Catalog::resolve(&paths, &provider()).await;
    assert!(matches!(result, Err(LoopcastError::InvalidCatalog(_))));
}
