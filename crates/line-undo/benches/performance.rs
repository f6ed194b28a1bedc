use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use line_undo::{LineUndoEditor, Position};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 48);
    for i in 0..line_count {
        out.push_str(&format!("{i:06} the quick brown fox jumps over the lazy dog\n"));
    }
    out.pop();
    out
}

/// One typed group on every `stride`-th line.
fn editor_with_history(line_count: usize, stride: usize) -> LineUndoEditor {
    let mut editor = LineUndoEditor::new_document(&large_text(line_count));
    for row in (0..line_count).step_by(stride) {
        editor.set_cursor(Position::new(row, 6));
        editor.type_text("edit").unwrap();
    }
    editor
}

fn bench_typing_burst(c: &mut Criterion) {
    c.bench_function("typing/100_chars_one_group", |b| {
        b.iter_batched(
            || editor_with_history(2_000, 10),
            |mut editor| {
                editor.set_cursor(Position::new(1_000, 0));
                for _ in 0..100 {
                    editor.type_text("x").unwrap();
                }
                black_box(editor.undo_stack().len());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_line_split_with_history(c: &mut Criterion) {
    c.bench_function("line_split/200_groups", |b| {
        b.iter_batched(
            || editor_with_history(2_000, 10),
            |mut editor| {
                editor.set_cursor(Position::new(10, 0));
                editor.type_text("\n").unwrap();
                black_box(editor.undo_stack().len());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_selective_undo_redo(c: &mut Criterion) {
    c.bench_function("selective_undo_redo/200_groups", |b| {
        b.iter_batched(
            || editor_with_history(2_000, 10),
            |mut editor| {
                editor.set_cursor(Position::new(1_000, 0));
                assert!(editor.selective_undo());
                assert!(editor.selective_redo());
                black_box(editor.redo_stack().len());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_typing_burst,
    bench_line_split_with_history,
    bench_selective_undo_redo
);
criterion_main!(benches);
