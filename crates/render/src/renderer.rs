use std::collections::BTreeSet;
use std::fmt::Write;
use zen_common::{GridPosition, LevelObjectType};
use zen_kernel::LevelState;

/// Everything a renderer may read for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub level: &'a LevelState,
    /// Selected or previewed cells, drawn as highlights.
    pub highlight: &'a BTreeSet<GridPosition>,
    /// Cell currently holding the player, if a play session runs.
    pub player: Option<GridPosition>,
}

/// Inclusive window of grid cells to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderView {
    pub min: GridPosition,
    pub max: GridPosition,
}

impl RenderView {
    pub fn new(min: GridPosition, max: GridPosition) -> Self {
        Self { min, max }
    }

    /// Smallest view holding every object, highlight and the player, grown by
    /// `margin` cells. `None` when the scene has nothing in it.
    pub fn fit(scene: &Scene<'_>, margin: i32) -> Option<Self> {
        let cells = scene
            .level
            .objects()
            .map(|o| o.position)
            .chain(scene.highlight.iter().copied())
            .chain(scene.player);
        let mut bounds: Option<(GridPosition, GridPosition)> = None;
        for cell in cells {
            bounds = Some(match bounds {
                None => (cell, cell),
                Some((lo, hi)) => (
                    GridPosition::new(lo.row.min(cell.row), lo.column.min(cell.column)),
                    GridPosition::new(hi.row.max(cell.row), hi.column.max(cell.column)),
                ),
            });
        }
        bounds.map(|(lo, hi)| Self {
            min: lo.offset(-margin, -margin),
            max: hi.offset(margin, margin),
        })
    }

    pub fn rows(&self) -> i32 {
        self.max.row - self.min.row + 1
    }

    pub fn columns(&self) -> i32 {
        self.max.column - self.min.column + 1
    }
}

/// Renderer-agnostic interface. Renderers only read the scene.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &Scene<'_>, view: &RenderView) -> Self::Output;
}

/// Draws a level as a character grid, top row first.
///
/// `#` block, `S` player start, `@` player, `+` highlight, `.` empty.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }

    fn glyph(scene: &Scene<'_>, cell: GridPosition) -> char {
        if scene.player == Some(cell) {
            return '@';
        }
        match scene.level.get(cell).map(|o| o.object_type) {
            Some(LevelObjectType::Block) => '#',
            Some(LevelObjectType::PlayerStart) => 'S',
            Some(LevelObjectType::Player) => '@',
            Some(LevelObjectType::PreviewBlock) => '+',
            None if scene.highlight.contains(&cell) => '+',
            None => '.',
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene<'_>, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Level (objects={}, hash={:016x}) ===",
            scene.level.len(),
            scene.level.state_hash()
        );
        let _ = writeln!(
            out,
            "View: rows {}..={} columns {}..={}",
            view.min.row, view.max.row, view.min.column, view.max.column
        );
        for row in (view.min.row..=view.max.row).rev() {
            let line: String = (view.min.column..=view.max.column)
                .map(|column| Self::glyph(scene, GridPosition::new(row, column)))
                .collect();
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: i32, column: i32) -> GridPosition {
        GridPosition::new(row, column)
    }

    fn grid_lines(output: &str) -> Vec<&str> {
        output.lines().skip(2).collect()
    }

    #[test]
    fn empty_scene_has_no_fitted_view() {
        let level = LevelState::new();
        let highlight = BTreeSet::new();
        let scene = Scene {
            level: &level,
            highlight: &highlight,
            player: None,
        };
        assert!(RenderView::fit(&scene, 1).is_none());

        let output = DebugTextRenderer::new().render(&scene, &RenderView::new(p(0, 0), p(0, 1)));
        assert!(output.contains("objects=0"));
        assert_eq!(grid_lines(&output), vec![".."]);
    }

    #[test]
    fn draws_top_row_first() {
        let mut level = LevelState::new();
        level.create(LevelObjectType::Block, p(0, 0)).unwrap();
        level.create(LevelObjectType::Block, p(0, 1)).unwrap();
        level
            .create(LevelObjectType::PlayerStart, p(1, 0))
            .unwrap();
        let highlight = BTreeSet::from([p(1, 1)]);
        let scene = Scene {
            level: &level,
            highlight: &highlight,
            player: None,
        };
        let view = RenderView::fit(&scene, 0).unwrap();
        assert_eq!(view, RenderView::new(p(0, 0), p(1, 1)));

        let output = DebugTextRenderer::new().render(&scene, &view);
        assert_eq!(grid_lines(&output), vec!["S+", "##"]);
    }

    #[test]
    fn player_draws_over_level_and_widens_view() {
        let mut level = LevelState::new();
        level.create(LevelObjectType::Block, p(0, 0)).unwrap();
        let highlight = BTreeSet::new();
        let scene = Scene {
            level: &level,
            highlight: &highlight,
            player: Some(p(0, 2)),
        };
        let view = RenderView::fit(&scene, 1).unwrap();
        assert_eq!(view.rows(), 3);
        assert_eq!(view.columns(), 5);

        let output = DebugTextRenderer::new().render(&scene, &view);
        assert_eq!(grid_lines(&output), vec![".....", ".#.@.", "....."]);
    }
}
