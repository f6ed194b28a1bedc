//! A short editing session showing selective undo/redo.
//!
//! Run with `RUST_LOG=line_undo=debug` to see the controller's decisions.

use line_undo::{LineUndoEditor, Position, Range};
use tracing_subscriber::EnvFilter;

fn print_document(title: &str, editor: &LineUndoEditor) {
    println!("== {title}");
    for (row, line) in editor.text().split('\n').enumerate() {
        println!("{row:>3} | {line}");
    }
    let state = editor.state();
    println!(
        "    undo: {}  redo: {}  lines {:?}: undo={} redo={}",
        state.undo_depth,
        state.redo_depth,
        state.target_lines,
        state.can_undo_on_lines,
        state.can_redo_on_lines
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .init();

    let mut editor = LineUndoEditor::new_document("fn main() {\n}\n");

    editor.set_cursor(Position::new(0, 11));
    editor.type_text("\n    let a = 1;")?;
    editor.type_text("\n    let b = 2;")?;
    editor.set_cursor(Position::new(0, 2));
    editor.type_text(" demo")?;
    print_document("after typing", &editor);

    editor.set_cursor(Position::new(1, 0));
    editor.selective_undo();
    print_document("undo on line 1", &editor);

    editor.select(Range::new(Position::new(0, 0), Position::new(2, 0)));
    editor.selective_undo();
    print_document("undo on lines 0..=2", &editor);

    editor.set_cursor(Position::new(1, 0));
    editor.selective_redo();
    print_document("redo on line 1", &editor);

    editor.global_undo();
    print_document("global undo", &editor);

    Ok(())
}
