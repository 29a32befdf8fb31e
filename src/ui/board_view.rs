//! Board rendering for the Caro GUI

use egui::{CornerRadius, Painter, Pos2, Rect, Sense, Stroke, Vec2};

use crate::board::{Board, Cell, Player, Pos, BOARD_SIZE, WIN_LENGTH};

use super::theme::*;

/// Board view handles rendering and input for the game board
pub struct BoardView {
    /// Cached cell size for coordinate calculations
    cell_size: f32,
    /// Board drawing area
    board_rect: Rect,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cell_size: 40.0,
            board_rect: Rect::NOTHING,
        }
    }
}

impl BoardView {
    /// Render the board and return the clicked empty cell, if any.
    ///
    /// `turn` is the side a click would play; `None` disables input.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        board: &Board,
        turn: Option<Player>,
        last_move: Option<Pos>,
        winning_line: Option<[Pos; WIN_LENGTH]>,
        line_visible: bool,
    ) -> Option<Pos> {
        let available_size = ui.available_size();
        let board_size = available_size.x.min(available_size.y) - 20.0;

        let (response, painter) = ui.allocate_painter(Vec2::splat(board_size), Sense::click());
        self.layout(response.rect);

        painter.rect_filled(self.board_rect, CornerRadius::same(4), BOARD_BG);
        self.draw_grid(&painter);
        self.draw_coordinates(&painter);
        self.draw_marks(&painter, board);

        if let Some(pos) = last_move {
            self.draw_last_move_marker(&painter, pos);
        }

        if let (Some(line), true) = (winning_line, line_visible) {
            self.draw_winning_line(&painter, &line);
        }

        let player = turn?;
        let board_pos = response.hover_pos().and_then(|p| self.screen_to_board(p))?;
        if !board.is_empty(board_pos) {
            return None;
        }

        self.draw_hover_preview(&painter, board_pos);
        if response.clicked() {
            tracing::trace!(%player, %board_pos, "board clicked");
            Some(board_pos)
        } else {
            None
        }
    }

    /// Fit the grid into `rect`
    fn layout(&mut self, rect: Rect) {
        self.board_rect = rect;
        let side = rect.width().min(rect.height());
        self.cell_size = (side - 2.0 * BOARD_MARGIN) / BOARD_SIZE as f32;
    }

    fn grid_origin(&self) -> Pos2 {
        self.board_rect.min + Vec2::splat(BOARD_MARGIN)
    }

    /// Draw the 10x10 cell grid
    fn draw_grid(&self, painter: &Painter) {
        let stroke = Stroke::new(GRID_LINE_WIDTH, GRID_LINE);
        let origin = self.grid_origin();
        let extent = BOARD_SIZE as f32 * self.cell_size;

        for i in 0..=BOARD_SIZE {
            let offset = i as f32 * self.cell_size;
            painter.line_segment(
                [origin + Vec2::new(offset, 0.0), origin + Vec2::new(offset, extent)],
                stroke,
            );
            painter.line_segment(
                [origin + Vec2::new(0.0, offset), origin + Vec2::new(extent, offset)],
                stroke,
            );
        }
    }

    /// Draw column (A-J) and row (0-9) labels
    fn draw_coordinates(&self, painter: &Painter) {
        let font = egui::FontId::proportional(12.0);
        let origin = self.grid_origin();

        for i in 0..BOARD_SIZE {
            let middle = (i as f32 + 0.5) * self.cell_size;

            let letter = (b'A' + i as u8) as char;
            let pos = Pos2::new(origin.x + middle, self.board_rect.min.y + BOARD_MARGIN * 0.5);
            painter.text(pos, egui::Align2::CENTER_CENTER, letter, font.clone(), COORD_LABEL);

            let pos = Pos2::new(self.board_rect.min.x + BOARD_MARGIN * 0.5, origin.y + middle);
            painter.text(pos, egui::Align2::CENTER_CENTER, i.to_string(), font.clone(), COORD_LABEL);
        }
    }

    fn draw_marks(&self, painter: &Painter, board: &Board) {
        for pos in board.occupied() {
            match board.get(pos) {
                Cell::X => self.draw_x(painter, pos),
                Cell::O => self.draw_o(painter, pos),
                Cell::Empty => {}
            }
        }
    }

    fn draw_x(&self, painter: &Painter, pos: Pos) {
        let center = self.board_to_screen(pos);
        let d = self.cell_size * MARK_RATIO;
        let stroke = Stroke::new(MARK_STROKE_WIDTH, X_MARK);
        painter.line_segment([center + Vec2::new(-d, -d), center + Vec2::new(d, d)], stroke);
        painter.line_segment([center + Vec2::new(-d, d), center + Vec2::new(d, -d)], stroke);
    }

    fn draw_o(&self, painter: &Painter, pos: Pos) {
        let center = self.board_to_screen(pos);
        painter.circle_stroke(
            center,
            self.cell_size * MARK_RATIO,
            Stroke::new(MARK_STROKE_WIDTH, O_MARK),
        );
    }

    fn cell_rect(&self, pos: Pos) -> Rect {
        Rect::from_center_size(self.board_to_screen(pos), Vec2::splat(self.cell_size))
    }

    fn draw_last_move_marker(&self, painter: &Painter, pos: Pos) {
        painter.rect_stroke(
            self.cell_rect(pos).shrink(2.0),
            CornerRadius::same(2),
            Stroke::new(LAST_MOVE_MARKER_WIDTH, LAST_MOVE_MARKER),
            egui::StrokeKind::Inside,
        );
    }

    /// Draw winning line highlight
    fn draw_winning_line(&self, painter: &Painter, line: &[Pos; WIN_LENGTH]) {
        let stroke = Stroke::new(WIN_STROKE_WIDTH, WIN_HIGHLIGHT);
        for pair in line.windows(2) {
            let start = self.board_to_screen(pair[0]);
            let end = self.board_to_screen(pair[1]);
            painter.line_segment([start, end], stroke);
        }
        for pos in line {
            painter.rect_stroke(
                self.cell_rect(*pos).shrink(1.0),
                CornerRadius::same(2),
                stroke,
                egui::StrokeKind::Inside,
            );
        }
    }

    fn draw_hover_preview(&self, painter: &Painter, pos: Pos) {
        painter.rect_filled(self.cell_rect(pos).shrink(1.0), CornerRadius::same(2), hover_valid());
    }

    /// Convert screen coordinates to the cell under them
    pub fn screen_to_board(&self, screen_pos: Pos2) -> Option<Pos> {
        let relative = screen_pos - self.grid_origin();
        let col = (relative.x / self.cell_size).floor() as i32;
        let row = (relative.y / self.cell_size).floor() as i32;
        Pos::checked(row, col)
    }

    /// Centre of a cell in screen coordinates
    pub fn board_to_screen(&self, pos: Pos) -> Pos2 {
        self.grid_origin()
            + Vec2::new(
                (pos.col as f32 + 0.5) * self.cell_size,
                (pos.row as f32 + 0.5) * self.cell_size,
            )
    }
}
