//! Idle Clicker rendering (read-only from state).

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::format::{format_number, plain};
use crate::i18n::{t, tr};
use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::achievements::ACHIEVEMENTS;
use super::actions::*;
use super::catalog::Catalog;
use super::logic::{
    active_upgrades, auto_click_interval_ms, auto_click_reward, auto_clicker_level, click_bonus,
    upgrade_rows,
};
use super::state::{ClickerState, Tab, ToastKind};

const SIDEBAR_WIDTH: u16 = 24;

pub fn render(
    state: &ClickerState,
    catalog: &Catalog,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let is_narrow = is_narrow_layout(area.width);

    let main = if is_narrow {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);
        render_tab_bar(state, f, chunks[0], click_state);
        chunks[1]
    } else {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(30)])
            .split(area);
        render_sidebar(state, f, chunks[0], click_state);
        chunks[1]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Panel
            Constraint::Length(1), // Toast
            Constraint::Length(1), // Help
        ])
        .split(main);

    let borders = if is_narrow {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    };

    match state.tab {
        Tab::Home => render_home(state, catalog, f, chunks[0], borders, click_state),
        Tab::Upgrades => render_upgrades(state, catalog, f, chunks[0], borders, click_state),
        Tab::Achievements => render_achievements(state, f, chunks[0], borders),
        Tab::Settings => render_settings(state, f, chunks[0], borders, click_state),
    }
    render_toast(state, f, chunks[1]);
    render_help(state, f, chunks[2]);
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn tab_style(state: &ClickerState, tab: Tab) -> Style {
    if state.tab == tab {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn tab_action(tab: Tab) -> u16 {
    match tab {
        Tab::Home => TAB_HOME,
        Tab::Upgrades => TAB_UPGRADES,
        Tab::Achievements => TAB_ACHIEVEMENTS,
        Tab::Settings => TAB_SETTINGS,
    }
}

fn panel_block(title: String, borders: Borders, color: Color) -> Block<'static> {
    Block::default()
        .borders(borders)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
}

// ── Navigation ─────────────────────────────────────────────────────────

fn render_sidebar(
    state: &ClickerState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    cl.push(Line::from(""));
    for &tab in Tab::all() {
        let style = tab_style(state, tab);
        cl.push_clickable(
            Line::from(Span::styled(format!(" [{}] {} ", tab.key(), t(tab.i18n_key())), style)),
            tab_action(tab),
        );
    }
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        format!(" {}", t("home.points")),
        Style::default().fg(Color::DarkGray),
    )));
    cl.push(Line::from(Span::styled(
        format!(" {}", format_number(state.points)),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));

    let block = panel_block(t("nav.menu"), Borders::ALL, Color::DarkGray);
    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0, false);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_tab_bar(
    state: &ClickerState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut bar = TabBar::new("│").block(
        Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    for &tab in Tab::all() {
        bar = bar.tab(t(tab.i18n_key()), tab_style(state, tab), tab_action(tab));
    }
    let mut cs = click_state.borrow_mut();
    bar.render(f, area, &mut cs);
}

// ── Home ───────────────────────────────────────────────────────────────

fn render_home(
    state: &ClickerState,
    catalog: &Catalog,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let gray = Style::default().fg(Color::Gray);
    let bonus = click_bonus(state, catalog);
    let mut cl = ClickableList::new();

    let mut points = vec![
        Span::styled(format!(" {}: ", t("home.points")), gray),
        Span::styled(
            format_number(state.points),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if state.settings.show_extended_points {
        points.push(Span::styled(
            format!("  ({})", plain(state.points)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    cl.push(Line::from(points));
    cl.push(Line::from(Span::styled(
        format!(
            " {}",
            tr("home.perClick", &[("amount", &format_number(bonus.per_click()))])
        ),
        gray,
    )));
    cl.push(Line::from(""));

    let button_style = if state.cooldown_ticks > 0 {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [Space] ", key_style()),
            Span::styled(format!(" {} ", t("home.clickButton")), button_style),
        ]),
        CLICK,
    );

    let auto_level = auto_clicker_level(state, catalog);
    if auto_level > 0 {
        let (label, color) = if state.auto_clicker_active {
            (t("home.autoClickerOn"), Color::Green)
        } else {
            (t("home.autoClickerOff"), Color::DarkGray)
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(" [T] ", key_style()),
                Span::styled(label, Style::default().fg(color)),
            ]),
            TOGGLE_AUTO_CLICKER,
        );
        let rate = tr(
            "home.autoClickerRate",
            &[
                ("reward", &format_number(auto_click_reward(auto_level))),
                ("interval", &auto_click_interval_ms(auto_level).to_string()),
            ],
        );
        cl.push(Line::from(Span::styled(format!("     {rate}"), gray)));
    }

    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        format!(" {}", t("home.activeUpgrades")),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    let owned = active_upgrades(state, catalog);
    if owned.is_empty() {
        cl.push(Line::from(Span::styled(
            format!("  {}", t("home.noUpgrades")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (def, level) in owned {
        cl.push(Line::from(vec![
            Span::styled(
                format!("  {} ", def.name),
                Style::default()
                    .fg(def.rarity.color())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("Lv.{}/{}", level, def.max_level),
                Style::default().fg(Color::White),
            ),
        ]));
        cl.push(Line::from(Span::styled(
            format!("    {}", def.effect_at(level)),
            gray,
        )));
    }

    let block = panel_block(t("nav.home"), borders, Color::Yellow);
    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0, true);
    drop(cs);
    f.render_widget(
        Paragraph::new(cl.into_lines())
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

// ── Upgrades ───────────────────────────────────────────────────────────

fn render_upgrades(
    state: &ClickerState,
    catalog: &Catalog,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled(format!(" {}: ", t("home.points")), Style::default().fg(Color::Gray)),
        Span::styled(
            format_number(state.points),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    for (idx, row) in upgrade_rows(state, catalog).into_iter().enumerate() {
        let Some(key) = buy_key(idx) else {
            log::warn!("upgrade {} has no buy key and is hidden", row.def.id);
            continue;
        };
        let action = BUY_UPGRADE_BASE + idx as u16;
        let rarity = row.def.rarity.color();
        let dim = !row.maxed && !row.affordable;

        cl.push(Line::from(""));
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!(" [{key}] "), key_style()),
                Span::styled(
                    row.def.name.clone(),
                    Style::default().fg(rarity).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", t(row.def.rarity.i18n_key())),
                    Style::default().fg(rarity),
                ),
                Span::styled(
                    format!("  Lv.{}/{}", row.level, row.def.max_level),
                    Style::default().fg(Color::White),
                ),
            ]),
            action,
        );
        cl.push(Line::from(Span::styled(
            format!("     {}", row.def.description_for(row.level)),
            Style::default().fg(if dim { Color::DarkGray } else { Color::Gray }),
        )));

        let status = if row.maxed {
            Span::styled(
                format!(
                    "     {} · {}",
                    t("upgrades.maxed"),
                    t("upgrades.maxLevelReached")
                ),
                Style::default().fg(Color::Yellow),
            )
        } else {
            let color = if row.affordable {
                Color::Green
            } else {
                Color::DarkGray
            };
            Span::styled(
                format!(
                    "     {}: {}  » {}",
                    t("upgrades.cost"),
                    format_number(row.cost),
                    t("upgrades.buy")
                ),
                Style::default().fg(color),
            )
        };
        cl.push_clickable(Line::from(status), action);
    }

    let block = panel_block(t("upgrades.available"), borders, Color::Magenta);
    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0, true);
    drop(cs);
    f.render_widget(
        Paragraph::new(cl.into_lines())
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

// ── Achievements ───────────────────────────────────────────────────────

fn render_achievements(state: &ClickerState, f: &mut Frame, area: Rect, borders: Borders) {
    let unlocked = ACHIEVEMENTS
        .iter()
        .filter(|a| state.has_achievement(a.id))
        .count();
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                " {}",
                tr(
                    "achievements.progress",
                    &[
                        ("unlocked", &unlocked.to_string()),
                        ("total", &ACHIEVEMENTS.len().to_string()),
                    ],
                )
            ),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    for a in ACHIEVEMENTS {
        let done = state.has_achievement(a.id);
        let (marker, name_style) = if done {
            (
                "★",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("☆", Style::default().fg(Color::DarkGray))
        };
        let mut spans = vec![
            Span::styled(format!(" {marker} "), name_style),
            Span::styled(t(&a.name_key()), name_style),
        ];
        if !done {
            spans.push(Span::styled(
                format!("  ({})", t("achievements.locked")),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(Span::styled(
            format!("     {}", t(&a.desc_key())),
            Style::default().fg(Color::Gray),
        )));
    }

    let block = panel_block(t("achievements.title"), borders, Color::Yellow);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

// ── Settings ───────────────────────────────────────────────────────────

fn render_settings(
    state: &ClickerState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let white = Style::default().fg(Color::White);
    let value = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut cl = ClickableList::new();

    cl.push(Line::from(Span::styled(
        format!(" {}", t("settings.generalSettings")),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(Span::styled(
        format!(" {}", t("settings.customizeExperience")),
        Style::default().fg(Color::DarkGray),
    )));
    cl.push(Line::from(""));

    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [L] ", key_style()),
            Span::styled(format!("{}: ", t("settings.language")), white),
            Span::styled(state.settings.language.native_name(), value),
        ]),
        CYCLE_LANGUAGE,
    );

    let extended = if state.settings.show_extended_points {
        t("settings.on")
    } else {
        t("settings.off")
    };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [X] ", key_style()),
            Span::styled(format!("{}: ", t("settings.showExtendedPoints")), white),
            Span::styled(extended, value),
        ]),
        TOGGLE_EXTENDED_POINTS,
    );

    cl.push(Line::from(""));
    let reset_style = if state.reset_armed {
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Red)
    };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [R] ", key_style()),
            Span::styled(t("settings.resetProgress"), reset_style),
        ]),
        RESET_PROGRESS,
    );
    if state.reset_armed {
        cl.push_clickable(
            Line::from(Span::styled(
                format!("     {}", t("settings.resetConfirm")),
                Style::default().fg(Color::Red),
            )),
            RESET_PROGRESS,
        );
    }

    let block = panel_block(t("settings.title"), borders, Color::Blue);
    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0, true);
    drop(cs);
    f.render_widget(
        Paragraph::new(cl.into_lines())
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

// ── Footer ─────────────────────────────────────────────────────────────

fn render_toast(state: &ClickerState, f: &mut Frame, area: Rect) {
    let Some(toast) = &state.toast else {
        return;
    };
    let color = match toast.kind {
        ToastKind::Info => Color::Cyan,
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", toast.message),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))),
        area,
    );
}

fn help_key(tab: Tab) -> &'static str {
    match tab {
        Tab::Home => "help.home",
        Tab::Upgrades => "help.upgrades",
        Tab::Achievements => "help.achievements",
        Tab::Settings => "help.settings",
    }
}

fn render_help(state: &ClickerState, f: &mut Frame, area: Rect) {
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", t(help_key(state.tab))),
            Style::default().fg(Color::DarkGray),
        ))),
        area,
    );
}
