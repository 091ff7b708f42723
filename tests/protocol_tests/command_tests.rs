//! Command Tests
//!
//! Tests for command rendering and request encoding.

use mpdlink::protocol::{encode_command, Command};
use mpdlink::MpdError;

fn render(command: Command) -> String {
    command.to_string()
}

// =============================================================================
// Rendering Tests
// =============================================================================

#[test]
fn test_render_simple_commands() {
    assert_eq!(render(Command::Status), "status");
    assert_eq!(render(Command::PlaylistInfo), "playlistinfo");
    assert_eq!(render(Command::Pause), "pause");
    assert_eq!(render(Command::Stop), "stop");
    assert_eq!(render(Command::Next), "next");
    assert_eq!(render(Command::Previous), "previous");
    assert_eq!(render(Command::Clear), "clear");
    assert_eq!(render(Command::Ping), "ping");
}

#[test]
fn test_render_play_optional_position() {
    assert_eq!(render(Command::Play { position: None }), "play");
    assert_eq!(render(Command::Play { position: Some(0) }), "play 0");
    assert_eq!(render(Command::Play { position: Some(12) }), "play 12");
}

#[test]
fn test_render_boolean_flags() {
    assert_eq!(render(Command::Repeat(true)), "repeat 1");
    assert_eq!(render(Command::Repeat(false)), "repeat 0");
    assert_eq!(render(Command::Random(true)), "random 1");
    assert_eq!(render(Command::Random(false)), "random 0");
    assert_eq!(render(Command::Single(true)), "single 1");
    assert_eq!(render(Command::Consume(false)), "consume 0");
}

#[test]
fn test_render_numeric_arguments() {
    assert_eq!(render(Command::SetVolume(75)), "setvol \"75\"");
    assert_eq!(render(Command::Crossfade(5)), "crossfade 5");
}

#[test]
fn test_render_seek_truncates_to_whole_seconds() {
    assert_eq!(render(Command::SeekCurrent(93.9)), "seekcur \"93\"");
    assert_eq!(render(Command::SeekCurrent(0.0)), "seekcur \"0\"");
}

#[test]
fn test_render_quoted_strings() {
    assert_eq!(
        render(Command::AlbumArt {
            uri: "Artist/Album/01 Song.flac".to_string(),
            offset: 8192,
        }),
        "albumart \"Artist/Album/01 Song.flac\" 8192"
    );
    assert_eq!(
        render(Command::Search {
            filter: "(artist == 'Nina')".to_string()
        }),
        "search \"(artist == 'Nina')\""
    );
    assert_eq!(render(Command::search_all()), "search \"(base '')\"");
}

#[test]
fn test_render_strings_pass_through_verbatim() {
    let cmd = Command::AddToQueue {
        uri: "say \"hi\".mp3".to_string(),
        position: None,
    };
    assert_eq!(render(cmd), "add \"say \"hi\".mp3\"");
}

#[test]
fn test_render_add_optional_position() {
    let uri = "x/y.ogg".to_string();
    assert_eq!(
        render(Command::AddToQueue {
            uri: uri.clone(),
            position: None
        }),
        "add \"x/y.ogg\""
    );
    assert_eq!(
        render(Command::AddToQueue {
            uri,
            position: Some(3)
        }),
        "add \"x/y.ogg\" 3"
    );
}

#[test]
fn test_render_delete_optional_end() {
    assert_eq!(render(Command::Delete { start: 4, end: None }), "delete 4");
    assert_eq!(
        render(Command::Delete {
            start: 4,
            end: Some(9)
        }),
        "delete 4 9"
    );
}

#[test]
fn test_render_command_list() {
    let list = Command::CommandList(vec![Command::Pause, Command::Play { position: Some(2) }]);
    assert_eq!(
        render(list),
        "command_list_begin\npause\nplay 2\ncommand_list_end"
    );
}

#[test]
fn test_render_empty_command_list() {
    assert_eq!(
        render(Command::CommandList(vec![])),
        "command_list_begin\ncommand_list_end"
    );
}

#[test]
fn test_command_names() {
    assert_eq!(Command::SetVolume(1).name(), "setvol");
    assert_eq!(Command::SeekCurrent(1.0).name(), "seekcur");
    assert_eq!(
        Command::AddToQueue {
            uri: String::new(),
            position: None
        }
        .name(),
        "add"
    );
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_appends_single_newline() {
    let encoded = encode_command(&Command::Status).unwrap();
    assert_eq!(&encoded[..], b"status\n");
}

#[test]
fn test_encode_command_list_ends_with_single_newline() {
    let list = Command::CommandList(vec![
        Command::AddToQueue {
            uri: "a.mp3".to_string(),
            position: None,
        },
        Command::AddToQueue {
            uri: "b.mp3".to_string(),
            position: None,
        },
    ]);
    let encoded = encode_command(&list).unwrap();
    assert_eq!(
        &encoded[..],
        b"command_list_begin\nadd \"a.mp3\"\nadd \"b.mp3\"\ncommand_list_end\n"
    );
}

#[test]
fn test_encode_rejects_line_break_in_argument() {
    let cmd = Command::AddToQueue {
        uri: "evil.mp3\nclear".to_string(),
        position: None,
    };
    let err = encode_command(&cmd).unwrap_err();
    assert!(matches!(err, MpdError::RequestMalformed(_)));
}

#[test]
fn test_encode_rejects_line_break_inside_list() {
    let list = Command::CommandList(vec![Command::Search {
        filter: "a\r\nb".to_string(),
    }]);
    assert!(matches!(
        encode_command(&list),
        Err(MpdError::RequestMalformed(_))
    ));
}

#[test]
fn test_encode_rejects_nested_command_list() {
    let nested = Command::CommandList(vec![Command::CommandList(vec![Command::Pause])]);
    assert!(matches!(
        encode_command(&nested),
        Err(MpdError::RequestMalformed(_))
    ));
}
