//! Benchmarks for vim_modal keystroke throughput.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;
use vim_modal::{
    Engine, EngineBuilder, InputEvent, KeyCode, KeyEvent, MemorySurface, Modifiers,
    traits::Clipboard,
};

/// Clipboard kept in memory so the benchmark never touches the system.
struct BenchClipboard {
    content: Option<String>,
}

impl Clipboard for BenchClipboard {
    fn get(&mut self) -> Option<String> {
        self.content.clone()
    }

    fn set(&mut self, text: String) {
        self.content = Some(text);
    }
}

fn generate_sample_text(lines: usize) -> String {
    let mut text = String::new();
    for i in 0..lines {
        text.push_str(&format!(
            "This is line {} with some sample text for benchmarking vim operations.\n",
            i + 1
        ));
        if i % 10 == 0 {
            text.push('\n'); // Add blank lines for paragraphs
        }
    }
    text
}

fn engine(lines: usize) -> Engine<MemorySurface> {
    EngineBuilder::default()
        .clipboard(BenchClipboard { content: None })
        .attach(MemorySurface::new(&generate_sample_text(lines)))
}

fn key(c: char) -> InputEvent {
    let mods = if c.is_ascii_uppercase() {
        Modifiers::SHIFT
    } else {
        Modifiers::empty()
    };
    InputEvent::Key(KeyEvent::with_mods(KeyCode::Char(c), mods))
}

fn special(code: KeyCode) -> InputEvent {
    InputEvent::Key(KeyEvent::plain(code))
}

fn benchmark_simple_movements(c: &mut Criterion) {
    let mut engine = engine(1000);

    c.bench_function("simple movements (hjkl)", |b| {
        b.iter(|| {
            for m in ['j', 'j', 'l', 'l', 'h', 'k'] {
                black_box(engine.handle_event(black_box(key(m))));
            }
            engine.take_events();
        });
    });
}

fn benchmark_word_movements(c: &mut Criterion) {
    let mut engine = engine(1000);

    c.bench_function("word movements (w/b)", |b| {
        b.iter(|| {
            for m in ['w', 'w', 'w', 'b', 'w'] {
                black_box(engine.handle_event(black_box(key(m))));
            }
            engine.take_events();
        });
    });
}

fn benchmark_delete_and_undo(c: &mut Criterion) {
    let mut engine = engine(1000);
    for k in "50G10|".chars() {
        engine.handle_event(key(k));
    }

    c.bench_function("delete then undo (dw, dd, u)", |b| {
        b.iter(|| {
            for k in ['d', 'w', 'd', 'd', 'u', 'u'] {
                black_box(engine.handle_event(black_box(key(k))));
            }
            black_box(engine.take_events());
        });
    });
}

fn benchmark_yank_put(c: &mut Criterion) {
    let mut engine = engine(200);

    c.bench_function("yank to clipboard and put (\"+yy \"+p u)", |b| {
        b.iter(|| {
            for k in "\"+yy\"+pu".chars() {
                black_box(engine.handle_event(black_box(key(k))));
            }
            engine.take_events();
        });
    });
}

fn benchmark_visual_selection(c: &mut Criterion) {
    let mut engine = engine(1000);

    c.bench_function("visual selection", |b| {
        b.iter(|| {
            engine.handle_event(black_box(key('v')));
            for _ in 0..5 {
                engine.handle_event(black_box(key('w')));
            }
            engine.handle_event(black_box(special(KeyCode::Esc)));
            black_box(engine.take_events());
        });
    });
}

fn benchmark_search_operations(c: &mut Criterion) {
    let mut engine = engine(1000);

    c.bench_function("search operations", |b| {
        b.iter(|| {
            engine.handle_event(black_box(key('/')));
            for ch in "line 9".chars() {
                engine.handle_event(black_box(InputEvent::ReceivedChar(ch)));
            }
            engine.handle_event(black_box(special(KeyCode::Enter)));
            black_box(engine.take_events());
        });
    });
}

fn benchmark_complex_sequence(c: &mut Criterion) {
    let mut engine = engine(1000);

    c.bench_function("complex keystroke sequence", |b| {
        b.iter(|| {
            // A realistic editing sequence
            for k in "5jwwdwi".chars() {
                black_box(engine.handle_event(black_box(key(k))));
            }
            for ch in "hello world".chars() {
                black_box(engine.handle_event(black_box(InputEvent::ReceivedChar(ch))));
            }
            engine.handle_event(black_box(special(KeyCode::Esc)));
            engine.handle_event(black_box(key('u')));
            black_box(engine.take_events());
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets = benchmark_simple_movements,
              benchmark_word_movements,
              benchmark_delete_and_undo,
              benchmark_yank_put,
              benchmark_visual_selection,
              benchmark_search_operations,
              benchmark_complex_sequence
}
criterion_main!(benches);
