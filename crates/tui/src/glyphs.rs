use std::collections::HashMap;

use once_cell::sync::Lazy;
use passcode_core::widget::{pips, PipGrid};

const GLYPH_HEIGHT: usize = 5;
const GLYPH_WIDTH: usize = 3;
const CELL_WIDTH: usize = 2;
const SPACING: usize = 1;
const FILL: char = '█';
const SHADE: char = '░';
const PIP: char = '●';
const SPOT: char = '◉';

type Glyph = [&'static str; GLYPH_HEIGHT];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('0', ["###", "# #", "# #", "# #", "###"]),
        ('1', [" # ", "## ", " # ", " # ", "###"]),
        ('2', ["###", "  #", "###", "#  ", "###"]),
        ('3', ["###", "  #", " ##", "  #", "###"]),
        ('4', ["# #", "# #", "###", "  #", "  #"]),
        ('5', ["###", "#  ", "###", "  #", "###"]),
        ('6', ["###", "#  ", "###", "# #", "###"]),
        ('7', ["###", "  #", " # ", " # ", " # "]),
        ('8', ["###", "# #", "###", "# #", "###"]),
        ('9', ["###", "# #", "###", "  #", "###"]),
        ('A', [" # ", "# #", "###", "# #", "# #"]),
        ('C', ["###", "#  ", "#  ", "#  ", "###"]),
        ('D', ["## ", "# #", "# #", "# #", "## "]),
        ('E', ["###", "#  ", "## ", "#  ", "###"]),
        ('O', ["###", "# #", "# #", "# #", "###"]),
        ('P', ["###", "# #", "###", "#  ", "#  "]),
        ('S', ["###", "#  ", "###", "  #", "###"]),
        ('-', ["   ", "   ", "###", "   ", "   "]),
        (' ', ["   ", "   ", "   ", "   ", "   "]),
        ('?', ["###", "  #", " ##", "   ", " # "]),
    ])
});

/// Render text in the chunky font with a one-cell drop shadow.
pub fn banner(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().map(|c| c.to_ascii_uppercase()).collect();
    if chars.is_empty() {
        return vec![String::new(); GLYPH_HEIGHT + 1];
    }

    let glyph_width = GLYPH_WIDTH * CELL_WIDTH;
    let width = chars.len() * (glyph_width + SPACING) + CELL_WIDTH;
    let mut canvas = vec![vec![' '; width]; GLYPH_HEIGHT + 1];

    for (index, ch) in chars.iter().enumerate() {
        let glyph = glyph_for(*ch);
        let x_offset = index * (glyph_width + SPACING);
        for (row, line) in glyph.iter().enumerate() {
            for (col, symbol) in line.chars().enumerate() {
                if symbol != '#' {
                    continue;
                }
                let x = x_offset + col * CELL_WIDTH;
                for dx in 0..CELL_WIDTH {
                    put(&mut canvas, row + 1, x + dx + 1, SHADE);
                    put(&mut canvas, row, x + dx, FILL);
                }
            }
        }
    }

    finish(canvas)
}

/// A single digit without shadow, sized to sit inside a slot box.
pub fn digit(value: u8) -> Vec<String> {
    let ch = char::from_digit(u32::from(value), 10).unwrap_or('?');
    glyph_for(ch)
        .iter()
        .map(|line| {
            line.chars()
                .flat_map(|symbol| {
                    let cell = if symbol == '#' { FILL } else { ' ' };
                    std::iter::repeat(cell).take(CELL_WIDTH)
                })
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Die face: pips inside a rounded frame.
pub fn die(value: u8) -> Vec<String> {
    let Some(grid) = pips(value) else {
        return digit(value);
    };
    let mut lines = vec!["╭───────╮".to_string()];
    lines.extend(
        pip_rows(&grid, PIP)
            .into_iter()
            .map(|row| format!("│ {row} │")),
    );
    lines.push("╰───────╯".to_string());
    lines
}

/// Loose spots without a frame, spread wider than a die face.
pub fn spots(value: u8) -> Vec<String> {
    let Some(grid) = pips(value) else {
        return digit(value);
    };
    let mut lines = Vec::new();
    for row in pip_rows(&grid, SPOT) {
        lines.push(row.replace(' ', "  "));
        lines.push(String::new());
    }
    lines.pop();
    lines
}

fn pip_rows(grid: &PipGrid, mark: char) -> Vec<String> {
    grid.iter()
        .map(|row| {
            row.iter()
                .map(|&set| if set { mark } else { '·' })
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn glyph_for(ch: char) -> &'static Glyph {
    GLYPHS
        .get(&ch)
        .or_else(|| GLYPHS.get(&'?'))
        .expect("fallback glyph missing")
}

fn put(canvas: &mut [Vec<char>], y: usize, x: usize, ch: char) {
    let Some(cell) = canvas.get_mut(y).and_then(|row| row.get_mut(x)) else {
        return;
    };
    if *cell == ' ' || (*cell == SHADE && ch == FILL) {
        *cell = ch;
    }
}

fn finish(canvas: Vec<Vec<char>>) -> Vec<String> {
    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect()
}
