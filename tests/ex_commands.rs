use vim_modal::{Engine, EngineBuilder, Event, KeyCode, MessageKind, Mode, TextSurface};

mod support;
use support::mock_buffer::MockBuffer;
use support::mock_host::MockHost;
use support::{feed, special};

fn engine(text: &str, cursor: usize) -> Engine<MockBuffer> {
    EngineBuilder::default()
        .host(MockHost::new())
        .attach(MockBuffer::new(text).at(cursor))
}

fn engine_with_host(text: &str, host: &MockHost) -> Engine<MockBuffer> {
    EngineBuilder::default()
        .host(host.clone())
        .attach(MockBuffer::new(text))
}

fn text(eng: &Engine<MockBuffer>) -> String {
    eng.surface().contents()
}

fn cursor(eng: &Engine<MockBuffer>) -> usize {
    eng.surface().cursor()
}

fn errors(eng: &mut Engine<MockBuffer>) -> Vec<String> {
    eng.take_events()
        .into_iter()
        .filter_map(|e| match e {
            Event::CommandBuffer {
                text,
                kind: MessageKind::Error,
            } => Some(text),
            _ => None,
        })
        .collect()
}

#[test]
fn test_delete_to_end_of_document() {
    let mut eng = engine("a\nb\nc\n", 2);
    feed(&mut eng, ":.,$d\n");
    assert_eq!(text(&eng), "a\n");
    assert_eq!(eng.register_text('"'), "b\nc\n");
    assert_eq!(eng.mode(), Mode::Command);
}

#[test]
fn test_whole_document_range() {
    let mut eng = engine("a\nb", 0);
    feed(&mut eng, ":%d\n");
    assert_eq!(text(&eng), "");
}

#[test]
fn test_relative_range_and_register() {
    let mut eng = engine("a\nb\nc", 0);
    feed(&mut eng, ":.,+1d\n");
    assert_eq!(text(&eng), "c");

    let mut eng = engine("x\ny", 0);
    feed(&mut eng, ":d a\n");
    assert_eq!(text(&eng), "y");
    assert_eq!(eng.register_text('a'), "x\n");
}

#[test]
fn test_line_number_moves_to_line_start() {
    let mut eng = engine("a\n  b\nc", 0);
    feed(&mut eng, ":2\n");
    assert_eq!(cursor(&eng), 2);
    feed(&mut eng, ":99\n");
    assert_eq!(cursor(&eng), 6);
}

#[test]
fn test_public_entry_point() {
    let mut eng = engine("a\nb\nc", 0);
    eng.handle_ex_command("3");
    assert_eq!(cursor(&eng), 4);
    eng.handle_ex_command("1,2d");
    assert_eq!(text(&eng), "c");
}

#[test]
fn test_unknown_command_is_reported() {
    let mut eng = engine("abc", 0);
    eng.take_events();
    feed(&mut eng, ":frob\n");
    assert_eq!(eng.mode(), Mode::Command);
    assert_eq!(errors(&mut eng), vec!["E492: Not an editor command: frob"]);
    assert_eq!(text(&eng), "abc");
}

#[test]
fn test_mark_addresses() {
    let mut eng = engine("a\nb\nc\nd\n", 0);
    feed(&mut eng, "majj:'a,.d\n");
    assert_eq!(text(&eng), "d\n");

    let mut eng = engine("a\nb", 0);
    eng.take_events();
    feed(&mut eng, ":'z\n");
    assert_eq!(errors(&mut eng), vec!["E20: Mark 'z' not set"]);
}

#[test]
fn test_write_new_file_then_refuse_overwrite() {
    let host = MockHost::new();
    let mut eng = engine_with_host("a\nb\nc\n", &host);
    feed(&mut eng, ":w out.txt\n");
    assert_eq!(host.file("out.txt").as_deref(), Some("a\nb\nc\n"));
    assert_eq!(eng.command_buffer(), "\"out.txt\" [New] 3L, 6C written");

    eng.take_events();
    feed(&mut eng, ":w out.txt\n");
    assert_eq!(
        errors(&mut eng),
        vec!["File 'out.txt' exists (add ! to override)"]
    );

    feed(&mut eng, "x:w! out.txt\n");
    assert_eq!(host.file("out.txt").as_deref(), Some("\nb\nc\n"));
    assert_eq!(eng.command_buffer(), "\"out.txt\" 3L, 5C written");
}

#[test]
fn test_write_range() {
    let host = MockHost::new();
    let mut eng = engine_with_host("a\nb\nc\n", &host);
    feed(&mut eng, ":2,3w part.txt\n");
    assert_eq!(host.file("part.txt").as_deref(), Some("b\nc\n"));
}

#[test]
fn test_write_without_name() {
    let mut eng = engine("abc", 0);
    eng.take_events();
    feed(&mut eng, ":w\n");
    assert_eq!(errors(&mut eng), vec!["E32: No file name"]);

    let host = MockHost::new();
    let mut eng = EngineBuilder::default()
        .host(host.clone())
        .attach(MockBuffer::new("abc").with_file_name("doc.txt"));
    feed(&mut eng, ":w\n");
    assert_eq!(host.file("doc.txt").as_deref(), Some("abc"));
    // The file now exists, but writing back to it needs no `!`.
    feed(&mut eng, "x:w\n");
    assert_eq!(host.file("doc.txt").as_deref(), Some("bc"));
}

#[test]
fn test_read_replaces_document_and_undoes() {
    let host = MockHost::new().with_file("in.txt", "new\ntext\n");
    let mut eng = engine_with_host("old", &host);
    feed(&mut eng, ":r in.txt\n");
    assert_eq!(text(&eng), "new\ntext\n");
    assert_eq!(eng.command_buffer(), "\"in.txt\" 2L, 9C");
    assert_eq!(cursor(&eng), 0);
    feed(&mut eng, "u");
    assert_eq!(text(&eng), "old");

    eng.take_events();
    feed(&mut eng, ":r missing.txt\n");
    assert_eq!(
        errors(&mut eng),
        vec!["Cannot open file 'missing.txt' for reading"]
    );
}

#[test]
fn test_filter_lines_through_host() {
    let host = MockHost::new();
    let mut eng = engine_with_host("b\na\nc\n", &host);
    feed(&mut eng, ":1,2!sort\n");
    assert_eq!(text(&eng), "a\nb\nc\n");
    assert_eq!(eng.command_buffer(), "2 lines filtered");
    assert_eq!(
        host.filter_calls(),
        vec![("sort".to_string(), "b\na\n".to_string())]
    );
    feed(&mut eng, "u");
    assert_eq!(text(&eng), "b\na\nc\n");
}

#[test]
fn test_filter_operator_runs_after_typing_command() {
    let host = MockHost::new();
    let mut eng = engine_with_host("b\na\nc\n", &host);
    feed(&mut eng, "2!!sort\n");
    assert_eq!(text(&eng), "a\nb\nc\n");
    assert_eq!(eng.mode(), Mode::Command);
}

#[test]
fn test_failing_filter_leaves_text() {
    let mut eng = engine("abc\n", 0);
    eng.take_events();
    feed(&mut eng, ":!bogus\n");
    assert_eq!(text(&eng), "abc\n");
    let errs = errors(&mut eng);
    assert_eq!(errs.len(), 1);
    assert!(errs[0].starts_with("Cannot run 'bogus'"));
}

#[test]
fn test_set_lists_and_changes_options() {
    let mut eng = engine("abc", 0);
    eng.take_events();
    feed(&mut eng, ":set\n");
    let listing = eng
        .take_events()
        .into_iter()
        .find_map(|e| match e {
            Event::ExtraInformation(s) => Some(s),
            _ => None,
        })
        .unwrap();
    assert!(listing.contains("tabstop: 8"));

    feed(&mut eng, ":set shiftwidth=4 expandtab\n");
    assert_eq!(eng.config().shift_width(), 4);
    assert!(eng.config().expand_tab());
    feed(&mut eng, ":se noexpandtab\n");
    assert!(!eng.config().expand_tab());
}

#[test]
fn test_redo_command() {
    let mut eng = engine("abc", 0);
    feed(&mut eng, "xu");
    assert_eq!(text(&eng), "abc");
    feed(&mut eng, ":redo\n");
    assert_eq!(text(&eng), "bc");
}

#[test]
fn test_quit_requests_close() {
    let mut eng = engine("abc", 0);
    eng.take_events();
    feed(&mut eng, ":q\n");
    assert!(eng.take_events().contains(&Event::QuitRequested));
}

#[test]
fn test_command_history_and_cancel() {
    let mut eng = engine("a\nb\nc\nd", 0);
    feed(&mut eng, ":d\n:");
    eng.handle_event(special(KeyCode::Up));
    assert_eq!(eng.command_buffer(), "d");
    feed(&mut eng, "\n");
    assert_eq!(text(&eng), "c\nd");

    feed(&mut eng, ":d\x1b");
    assert_eq!(eng.mode(), Mode::Command);
    assert_eq!(text(&eng), "c\nd");

    // An empty line does nothing.
    feed(&mut eng, ":\n");
    assert_eq!(eng.mode(), Mode::Command);
    assert_eq!(text(&eng), "c\nd");
}

#[test]
fn test_filter_operator_releases_register() {
    let mut eng = engine("b\na\n", 0);
    feed(&mut eng, "\"a!!");
    assert_eq!(eng.mode(), Mode::Ex);
    feed(&mut eng, "\x1b");
    assert_eq!(eng.mode(), Mode::Command);
    feed(&mut eng, "yl");
    assert_eq!(eng.register_text('a'), "");
    assert_eq!(eng.register_text('"'), "b");
}
