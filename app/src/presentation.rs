//! Screen rendering.
//!
//! Turns screen descriptors into outbound messages: a caption plus an inline
//! keyboard of labelled, event-tagged buttons. No navigation decisions are
//! made here.

use crate::catalog::Stats;
use crate::event::Event;
use std::path::PathBuf;

pub const ROUTES_PER_ROW: usize = 4;
pub const STATS_PLACEHOLDER: &str = "данные обновляются";

pub const ROOT_CAPTION: &str = "🚍 Бот карт маршрутов\n\nВыберите район:";
pub const CONTROLS_CAPTION: &str = "Выберите действие:";
pub const FAILURE_NOTICE: &str = "❌ Ошибка при загрузке фото";

const BACK_TO_DISTRICTS_LABEL: &str = "⬅️ Назад к районам";
const BACK_TO_ROUTES_LABEL: &str = "⬅️ Назад к маршрутам";
const HOME_LABEL: &str = "🏠 Начальное меню";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, event: &Event) -> Self {
        Self {
            label: label.into(),
            data: event.callback_data(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn single_column(buttons: impl IntoIterator<Item = Button>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    pub fn grid(buttons: Vec<Button>, per_row: usize) -> Self {
        Self {
            rows: buttons
                .chunks(per_row.max(1))
                .map(<[Button]>::to_vec)
                .collect(),
        }
    }

    pub fn with_row(mut self, row: Vec<Button>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

/// Where a text message goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Sent as a new message in the chat.
    NewMessage,
    /// Replaces the message whose button produced the event.
    EditOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text {
        text: String,
        keyboard: Option<Keyboard>,
        delivery: Delivery,
    },
    Photo {
        path: PathBuf,
        caption: String,
        protect_content: bool,
    },
}

impl Outbound {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            keyboard: None,
            delivery: Delivery::NewMessage,
        }
    }

    pub fn keyboard(&self) -> Option<&Keyboard> {
        match self {
            Self::Text { keyboard, .. } => keyboard.as_ref(),
            Self::Photo { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    DistrictList {
        districts: Vec<String>,
    },
    RouteList {
        district: String,
        routes: Vec<String>,
    },
    RouteDetail {
        district: String,
        route: String,
        stats: Option<Stats>,
        photo: Option<PathBuf>,
    },
    /// The navigation buttons shown under a route detail.
    DetailControls {
        district: String,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    protect_content: bool,
}

impl Renderer {
    pub fn new(protect_content: bool) -> Self {
        Self { protect_content }
    }

    pub fn render(&self, screen: &Screen, delivery: Delivery) -> Vec<Outbound> {
        match screen {
            Screen::DistrictList { districts } => vec![Outbound::Text {
                text: ROOT_CAPTION.to_string(),
                keyboard: Some(district_keyboard(districts)),
                delivery,
            }],
            Screen::RouteList { district, routes } => vec![Outbound::Text {
                text: route_list_caption(district),
                keyboard: Some(route_keyboard(routes)),
                delivery,
            }],
            Screen::RouteDetail {
                district,
                route,
                stats,
                photo,
            } => {
                let caption = detail_caption(district, route, *stats);
                let detail = match photo {
                    Some(path) => Outbound::Photo {
                        path: path.clone(),
                        caption,
                        protect_content: self.protect_content,
                    },
                    None => Outbound::text(format!(
                        "❌ Фото для маршрута {route} не найдено\n\n{caption}"
                    )),
                };
                vec![detail, controls(district, Delivery::NewMessage)]
            }
            Screen::DetailControls { district } => vec![controls(district, delivery)],
        }
    }

    /// Renders `screen` with `notice` prepended to its first text message.
    pub fn render_with_notice(
        &self,
        screen: &Screen,
        delivery: Delivery,
        notice: &str,
    ) -> Vec<Outbound> {
        let mut messages = self.render(screen, delivery);
        if let Some(Outbound::Text { text, .. }) = messages
            .iter_mut()
            .find(|m| matches!(m, Outbound::Text { .. }))
        {
            *text = format!("{notice}\n\n{text}");
        }
        messages
    }
}

pub fn route_list_caption(district: &str) -> String {
    format!("📍 Район: {district}\nВыберите номер маршрута:")
}

pub fn detail_caption(district: &str, route: &str, stats: Option<Stats>) -> String {
    let (boxes, entrances) = match stats {
        Some(s) => (s.boxes.to_string(), s.entrances.to_string()),
        None => (STATS_PLACEHOLDER.to_string(), STATS_PLACEHOLDER.to_string()),
    };
    format!(
        "🗺️ Маршрут №{route}\n📦 Ящиков: {boxes}\n🚪 Подъездов: {entrances}\n📍 Район: {district}"
    )
}

fn district_keyboard(districts: &[String]) -> Keyboard {
    Keyboard::single_column(
        districts
            .iter()
            .map(|d| Button::new(d.clone(), &Event::SelectDistrict(d.clone()))),
    )
}

fn route_keyboard(routes: &[String]) -> Keyboard {
    let buttons = routes
        .iter()
        .map(|r| Button::new(r.clone(), &Event::SelectRoute(r.clone())))
        .collect();
    Keyboard::grid(buttons, ROUTES_PER_ROW).with_row(vec![Button::new(
        BACK_TO_DISTRICTS_LABEL,
        &Event::BackToDistricts,
    )])
}

fn controls(district: &str, delivery: Delivery) -> Outbound {
    Outbound::Text {
        text: CONTROLS_CAPTION.to_string(),
        keyboard: Some(Keyboard::single_column([
            Button::new(
                BACK_TO_ROUTES_LABEL,
                &Event::SelectDistrict(district.to_string()),
            ),
            Button::new(HOME_LABEL, &Event::BackToDistricts),
        ])),
        delivery,
    }
}
