//! Main application for the Caro GUI

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel};
use tracing::info;

use crate::board::{Cell, Player, Pos, WIN_LENGTH};
use crate::config::CaroConfig;
use crate::engine::{AiEngine, AiLevel};
use crate::rules::Outcome;
use crate::session::{ChannelObserver, GameSession, Scores, SessionEvent, SessionObserver, Snapshot};

use super::board_view::BoardView;
use super::game_state::{status_text, MenuChoice, Screen, ViewState};
use super::theme::*;

/// Forwards session events into the app's channel and wakes the UI.
struct RepaintObserver {
    channel: ChannelObserver,
    ctx: Context,
}

impl RepaintObserver {
    fn forward(&self, event: SessionEvent) {
        event.dispatch(&self.channel);
        self.ctx.request_repaint();
    }
}

impl SessionObserver for RepaintObserver {
    fn on_cell_changed(&self, pos: Pos, cell: Cell) {
        self.forward(SessionEvent::CellChanged { pos, cell });
    }

    fn on_turn_changed(&self, player: Player) {
        self.forward(SessionEvent::TurnChanged(player));
    }

    fn on_game_ended(&self, outcome: Outcome, line: Option<[Pos; WIN_LENGTH]>) {
        self.forward(SessionEvent::GameEnded { outcome, line });
    }

    fn on_scores_changed(&self, x: u32, o: u32) {
        self.forward(SessionEvent::ScoresChanged(Scores { x, o }));
    }

    fn on_search_started(&self) {
        self.forward(SessionEvent::SearchStarted);
    }

    fn on_search_finished(&self) {
        self.forward(SessionEvent::SearchFinished);
    }
}

/// Main Caro application
pub struct CaroApp {
    session: GameSession,
    events: Receiver<SessionEvent>,
    view: ViewState,
    board_view: BoardView,
    /// Menu entry used by RePlay
    choice: MenuChoice,
    show_debug: bool,
}

impl CaroApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &CaroConfig) -> Self {
        let (channel, events) = ChannelObserver::new();
        let observer = RepaintObserver {
            channel,
            ctx: cc.egui_ctx.clone(),
        };
        let session = GameSession::with_engine(Arc::new(observer), AiEngine::new(), config.first_player);

        Self {
            session,
            events,
            view: ViewState::new(Duration::from_millis(config.blink_interval_ms)),
            board_view: BoardView::default(),
            choice: MenuChoice::from_mode(config.mode, config.level),
            show_debug: false,
        }
    }

    fn start(&mut self, choice: MenuChoice) {
        let (mode, level) = choice.mode_level(AiLevel::default());
        self.choice = choice;
        self.view.reset_game();
        self.view.screen = Screen::Playing;
        self.session.start_game(mode, level);
    }

    fn back_to_menu(&mut self) {
        self.session.cancel_game();
        self.view.reset_game();
        self.view.screen = Screen::Menu;
        info!("back to menu");
    }

    fn drain_events(&mut self, now: Instant) {
        for event in self.events.try_iter() {
            self.view.apply(&event, now);
        }
    }

    /// Mode selection screen
    fn render_menu(&mut self, ctx: &Context) {
        CentralPanel::default()
            .frame(Frame::new().fill(PANEL_BG))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.2);
                    ui.label(RichText::new("CARO").size(40.0).strong().color(TEXT_PRIMARY));
                    ui.label(RichText::new("five in a row on a 10x10 board").size(12.0).color(TEXT_MUTED));
                    ui.add_space(24.0);

                    let mut picked = None;
                    for choice in MenuChoice::ALL {
                        let text = RichText::new(choice.label()).size(16.0).color(TEXT_PRIMARY);
                        let button = egui::Button::new(text)
                            .min_size(egui::vec2(260.0, 36.0))
                            .fill(BUTTON_BG)
                            .selected(choice == self.choice);
                        if ui.add(button).clicked() {
                            picked = Some(choice);
                        }
                        ui.add_space(8.0);
                    }
                    if let Some(choice) = picked {
                        self.start(choice);
                    }
                });
            });
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    if ui.button("RePlay (R)").clicked() {
                        self.start(self.choice);
                        ui.close_menu();
                    }
                    if ui.button("Reset scores").clicked() {
                        self.session.reset_scores();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Menu (M)").clicked() {
                        self.back_to_menu();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "Debug Panel (D)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(self.choice.label());
                });
            });
        });
    }

    /// Render the side panel with game info and debug
    fn render_side_panel(&mut self, ctx: &Context, snapshot: &Snapshot) {
        SidePanel::right("info_panel")
            .min_width(220.0)
            .max_width(260.0)
            .frame(Frame::new().fill(PANEL_BG))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                ui.label(RichText::new("CARO").size(22.0).strong().color(TEXT_PRIMARY));
                ui.add_space(12.0);

                self.render_status_card(ui, snapshot);
                ui.add_space(10.0);
                Self::render_scores_card(ui, snapshot);
                ui.add_space(10.0);
                self.render_actions_card(ui);

                if self.show_debug {
                    ui.add_space(10.0);
                    Self::render_debug_card(ui, snapshot);
                }

                if let Some(msg) = &self.view.message {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, msg);
                }
            });
    }

    /// Helper to create a card frame
    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_status_card(&self, ui: &mut egui::Ui, snapshot: &Snapshot) {
        Self::card_frame().show(ui, |ui| {
            let color = if snapshot.searching { STATUS_THINKING } else { STATUS_TURN };
            ui.label(RichText::new(status_text(snapshot)).size(20.0).strong().color(color));

            if let Some(since) = self.view.thinking_since {
                ui.label(
                    RichText::new(format!("{:.1}s", since.elapsed().as_secs_f32()))
                        .size(11.0)
                        .color(TEXT_SECONDARY),
                );
            }
            if let Some(game) = snapshot.game {
                ui.label(
                    RichText::new(format!("Move #{}", game.move_count))
                        .size(11.0)
                        .color(TEXT_SECONDARY),
                );
            }
        });
    }

    fn render_scores_card(ui: &mut egui::Ui, snapshot: &Snapshot) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("SCORES").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);
            for (player, color) in [(Player::X, X_MARK), (Player::O, O_MARK)] {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(player.to_string()).size(18.0).strong().color(color));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(snapshot.scores.get(player).to_string())
                                .size(18.0)
                                .color(TEXT_PRIMARY),
                        );
                    });
                });
            }
        });
    }

    fn render_actions_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("ACTIONS").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            let btn_frame = Frame::new()
                .fill(BUTTON_BG)
                .corner_radius(CornerRadius::same(6))
                .inner_margin(8.0);
            let action = |ui: &mut egui::Ui, text: &str| {
                btn_frame
                    .show(ui, |ui| {
                        ui.add(
                            egui::Label::new(RichText::new(text).size(12.0).color(TEXT_PRIMARY))
                                .sense(egui::Sense::click()),
                        )
                        .clicked()
                    })
                    .inner
            };

            ui.horizontal(|ui| {
                if action(ui, "RePlay") {
                    self.start(self.choice);
                }
                if action(ui, "Reset") {
                    self.session.reset_scores();
                }
                if action(ui, "Menu") {
                    self.back_to_menu();
                }
            });
        });
    }

    fn render_debug_card(ui: &mut egui::Ui, snapshot: &Snapshot) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("AI DEBUG").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            match snapshot.last_search {
                Some(result) => {
                    ui.label(
                        RichText::new(format!("{} / score {}", result.level.name(), result.score))
                            .size(11.0)
                            .color(STATUS_TURN),
                    );
                    ui.label(
                        RichText::new(format!("{} nodes in {}ms", result.nodes, result.time_ms))
                            .size(10.0)
                            .color(TEXT_SECONDARY),
                    );
                    if let Some(pos) = result.best_move {
                        ui.label(RichText::new(format!("-> {pos}")).size(12.0).strong().color(WIN_HIGHLIGHT));
                    }
                }
                None => {
                    ui.label(RichText::new("No computer move yet").size(10.0).color(TEXT_MUTED));
                }
            }
        });
    }

    fn render_message_card(ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(STATUS_ERROR)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
            });
    }

    /// Side a click plays, if input is accepted right now
    fn clickable_side(snapshot: &Snapshot) -> Option<Player> {
        let game = snapshot.game?;
        if game.outcome != Outcome::InProgress || snapshot.searching || game.is_computer_turn() {
            return None;
        }
        Some(game.current_player)
    }

    fn render_board(&mut self, ctx: &Context, snapshot: &Snapshot, now: Instant) {
        CentralPanel::default()
            .frame(Frame::new().fill(BOARD_AREA_BG).inner_margin(10.0))
            .show(ctx, |ui| {
                let turn = Self::clickable_side(snapshot);
                let clicked = self.board_view.show(
                    ui,
                    &snapshot.board,
                    turn,
                    self.view.last_move,
                    self.view.winning_line,
                    self.view.line_visible(now),
                );

                if let (Some(pos), Some(player)) = (clicked, turn) {
                    if let Err(err) = self.session.submit_move(player, pos) {
                        self.view.message = Some(err.to_string());
                    }
                }
            });
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        let (debug, replay, menu) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::D),
                i.key_pressed(egui::Key::R),
                i.key_pressed(egui::Key::M),
            )
        });
        if debug {
            self.show_debug = !self.show_debug;
        }
        if self.view.screen == Screen::Playing {
            if replay {
                self.start(self.choice);
            } else if menu {
                self.back_to_menu();
            }
        }
    }
}

impl eframe::App for CaroApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.drain_events(now);
        self.handle_input(ctx);

        match self.view.screen {
            Screen::Menu => self.render_menu(ctx),
            Screen::Playing => {
                let snapshot = self.session.snapshot();
                self.render_menu_bar(ctx);
                self.render_side_panel(ctx, &snapshot);
                self.render_board(ctx, &snapshot, now);

                if snapshot.searching {
                    ctx.request_repaint_after(Duration::from_millis(100));
                }
            }
        }

        if let Some(blink) = self.view.blink {
            ctx.request_repaint_after(blink.next_toggle(now));
        }
    }
}

impl Drop for CaroApp {
    fn drop(&mut self) {
        self.session.cancel_game();
        self.session.wait_idle();
    }
}
