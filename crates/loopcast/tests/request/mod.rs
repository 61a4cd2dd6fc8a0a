use loopcast::{
    request::MAX_WINDOW_MILLIS, LoopcastError, PlaylistRequest, PlaylistType, PresentationEnd,
    ScheduleConfig,
};

use crate::AssertWrapper;

#[test]
fn test_from_path() {
    let config = ScheduleConfig::default();
    let request = PlaylistRequest::from_path(
        "/type/live/disc/no/time/1700000000/window/60/pet/future/csmi/yes/kf/yes",
        &config,
    )
    .assert_success();

    assert_eq!(request.playlist_type, PlaylistType::Live);
    assert!(!request.discontinuity);
    assert_eq!(request.query_time_millis, Some(1_700_000_000_000));
    assert_eq!(request.dvr_window_millis, 60000);
    assert_eq!(request.segment_duration_millis, 10000);
    assert_eq!(request.safety_margin_millis, 10000);
    assert_eq!(request.presentation_end, Some(PresentationEnd::Future));
    assert_eq!(request.consistent_sequence_media_info, Some(true));
    assert!(request.key_frames);
}

#[test]
fn test_from_path_defaults() {
    let config = ScheduleConfig {
        segment_duration: 6000,
        segment_count: 5,
        safety_margin: 0,
    };
    let request = PlaylistRequest::from_path("type/vod", &config).assert_success();

    assert_eq!(request.playlist_type, PlaylistType::Vod);
    assert!(request.discontinuity);
    assert_eq!(request.query_time_millis, None);
    assert_eq!(request.dvr_window_millis, 30000);
    assert_eq!(request.presentation_end, None);
    assert!(!request.key_frames);
}

#[test]
fn test_from_path_rejects_invalid_values() {
    let config = ScheduleConfig::default();
    let cases = [
        (
            "/type/stream",
            "invalid value for 'type', must be one of [vod,playlist,live]",
        ),
        (
            "/disc/yes",
            "invalid value for 'type', must be one of [vod,playlist,live]",
        ),
        (
            "/type/live/disc/gap",
            "invalid value for 'disc', must be one of [no,yes]",
        ),
        (
            "/type/live/window/ten",
            "invalid value for 'window', must be numeric",
        ),
        (
            "/type/live/time/now",
            "invalid value for 'time', must be numeric",
        ),
        (
            "/type/live/pet/soon",
            "invalid value for 'pet', must be one of [past,future]",
        ),
        (
            "/type/live/window/-5",
            "invalid value for 'window', must be a non-negative number",
        ),
    ];

    for (path, message) in cases {
        let err = PlaylistRequest::from_path(path, &config).unwrap_err();
        assert!(matches!(err, LoopcastError::InvalidConfiguration { .. }));
        assert_eq!(err.to_string(), message, "path: {path}");
    }
}

#[test]
fn test_deserialize_json_request() {
    let request: PlaylistRequest = serde_json::from_str(
        r#"{
            "playlistType": "live",
            "queryTimeMillis": 1700000000000,
            "dvrWindowMillis": 100000,
            "segmentDurationMillis": 10000,
            "safetyMarginMillis": 10000
        }"#,
    )
    .assert_success();

    assert_eq!(request.playlist_type, PlaylistType::Live);
    assert!(request.discontinuity);
    assert_eq!(request.query_time_millis, Some(1_700_000_000_000));
    request.validate().assert_success();

    let err = serde_json::from_str::<PlaylistRequest>(
        r#"{"playlistType": "stream", "dvrWindowMillis": 1, "segmentDurationMillis": 1, "safetyMarginMillis": 1}"#,
    )
    .unwrap_err();
    assert!(
        err.to_string()
            .starts_with("invalid value for 'type', must be one of [vod,playlist,live]"),
        "{err}"
    );

    let err = serde_json::from_str::<PlaylistRequest>(
        r#"{"playlistType": "live", "dvrWindowMillis": 1, "segmentDurationMillis": 1, "safetyMarginMillis": 1, "presentationEnd": "soon"}"#,
    )
    .unwrap_err();
    assert!(
        err.to_string()
            .starts_with("invalid value for 'pet', must be one of [past,future]"),
        "{err}"
    );
}

#[test]
fn test_serialize_request_types() {
    let mut request = PlaylistRequest::new(PlaylistType::Playlist, &ScheduleConfig::default());
    request.presentation_end = Some(PresentationEnd::Past);

    let json = serde_json::to_value(&request).assert_success();
    assert_eq!(json["playlistType"], "playlist");
    assert_eq!(json["presentationEnd"], "past");
    assert_eq!(
        serde_json::from_value::<PlaylistRequest>(json).assert_success(),
        request
    );
}

#[test]
fn test_from_path_rejects_overflowing_seconds() {
    let config = ScheduleConfig::default();
    for path in [
        "/type/live/window/9223372036854776",
        "/type/live/time/9223372036854776",
        "/type/live/time/-9223372036854776",
    ] {
        let err = PlaylistRequest::from_path(path, &config).unwrap_err();
        assert!(
            matches!(err, LoopcastError::InvalidConfiguration { .. }),
            "path: {path}"
        );
    }
}

#[test]
fn test_validate() {
    let mut request = PlaylistRequest::new(PlaylistType::Live, &ScheduleConfig::default());
    request.validate().assert_success();

    request.segment_duration_millis = -1;
    assert_eq!(
        request.validate().unwrap_err().to_string(),
        "invalid value for 'segmentDuration', must be a positive number of milliseconds"
    );

    request.segment_duration_millis = 10000;
    request.safety_margin_millis = -1;
    request.validate().assert_error();
}

#[test]
fn test_validate_bounds() {
    let base = PlaylistRequest::new(PlaylistType::Live, &ScheduleConfig::default());

    let mut request = base.clone();
    request.dvr_window_millis = i64::MAX - 5000;
    assert_eq!(
        request.validate().unwrap_err().to_string(),
        format!("invalid value for 'window', must be at most {MAX_WINDOW_MILLIS} milliseconds")
    );

    let mut request = base.clone();
    request.dvr_window_millis = MAX_WINDOW_MILLIS;
    request.safety_margin_millis = MAX_WINDOW_MILLIS;
    request.validate().assert_success();

    request.safety_margin_millis = MAX_WINDOW_MILLIS + 1;
    request.validate().assert_error();

    let mut request = base.clone();
    request.dvr_window_millis = 0;
    request.safety_margin_millis = 0;
    assert_eq!(
        request.validate().unwrap_err().to_string(),
        "invalid value for 'window', must be positive when safetyMargin is 0"
    );
    request.safety_margin_millis = 1;
    request.validate().assert_success();

    let request = base.clone().with_query_time(i64::MIN);
    request.validate().assert_error();
    let request = base.with_query_time(1_700_000_000_000);
    request.validate().assert_success();
}
