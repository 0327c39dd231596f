//! The district → route → detail state machine.
//!
//! [`Navigator::handle`] is pure apart from the asset probe: it takes the
//! current session and one event and returns the next session together with
//! the messages to send. Hosting (polling, storage, delivery) is left to the
//! caller.

use crate::assets::AssetResolver;
use crate::catalog::Catalog;
use crate::event::Event;
use crate::presentation::{Delivery, FAILURE_NOTICE, Outbound, Renderer, Screen};
use crate::session::{NavState, Session};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: Session,
    pub messages: Vec<Outbound>,
}

pub struct Navigator<'a> {
    catalog: &'a Catalog,
    assets: AssetResolver,
    renderer: Renderer,
}

impl<'a> Navigator<'a> {
    pub fn new(catalog: &'a Catalog, assets: AssetResolver, renderer: Renderer) -> Self {
        Self {
            catalog,
            assets,
            renderer,
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn handle(&self, session: Session, event: &Event) -> Transition {
        match event {
            Event::Start => self.root(Delivery::NewMessage),
            Event::BackToDistricts => self.root(Delivery::EditOrigin),
            Event::SelectDistrict(district) => self.enter_district(session, district),
            Event::SelectRoute(route) => match self.catalog.district_of(route) {
                Some(district) => self.enter_detail(session, district, route),
                None => {
                    warn!("Selection of unknown route {:?}", route);
                    self.reject(session, &format!("⚠️ Маршрут {route} не найден"))
                }
            },
            Event::Unrecognized(raw) => {
                warn!("Unrecognized callback data {:?}", raw);
                self.reject(session, "⚠️ Неизвестная команда")
            }
        }
    }

    fn root(&self, delivery: Delivery) -> Transition {
        Transition {
            session: Session::default(),
            messages: self.renderer.render(&self.district_list(), delivery),
        }
    }

    fn enter_district(&self, session: Session, district: &str) -> Transition {
        match self.catalog.routes_of(district) {
            Ok(routes) => {
                let screen = Screen::RouteList {
                    district: district.to_string(),
                    routes: routes.to_vec(),
                };
                Transition {
                    session: Session {
                        district: Some(district.to_string()),
                        route: None,
                    },
                    messages: self.renderer.render(&screen, Delivery::EditOrigin),
                }
            }
            Err(e) => {
                warn!("{}", e);
                self.reject(session, &format!("⚠️ Район «{district}» не найден"))
            }
        }
    }

    fn enter_detail(&self, session: Session, district: &str, route: &str) -> Transition {
        if session.district.as_deref() != Some(district) {
            debug!(
                "Route {} selected outside its district {:?}, switching to {}",
                route, session.district, district
            );
        }

        let photo = match self.assets.resolve(route) {
            Ok(photo) => photo,
            Err(e) => {
                error!("Failed to load photo for route {}: {}", route, e);
                return Transition {
                    session,
                    messages: vec![Outbound::text(FAILURE_NOTICE)],
                };
            }
        };

        let screen = Screen::RouteDetail {
            district: district.to_string(),
            route: route.to_string(),
            stats: self.catalog.stats_of(route),
            photo,
        };

        Transition {
            session: Session {
                district: Some(district.to_string()),
                route: Some(route.to_string()),
            },
            messages: self.renderer.render(&screen, Delivery::NewMessage),
        }
    }

    /// Re-renders the current screen with `notice` and leaves the session alone.
    fn reject(&self, session: Session, notice: &str) -> Transition {
        let screen = self.current_screen(&session);
        Transition {
            messages: self
                .renderer
                .render_with_notice(&screen, Delivery::EditOrigin, notice),
            session,
        }
    }

    fn current_screen(&self, session: &Session) -> Screen {
        match session.state() {
            NavState::DistrictList => self.district_list(),
            NavState::RouteList { district } => match self.catalog.routes_of(&district) {
                Ok(routes) => Screen::RouteList {
                    district,
                    routes: routes.to_vec(),
                },
                Err(_) => self.district_list(),
            },
            NavState::RouteDetail { district, .. } => Screen::DetailControls { district },
        }
    }

    fn district_list(&self) -> Screen {
        Screen::DistrictList {
            districts: self.catalog.districts().map(str::to_string).collect(),
        }
    }
}
