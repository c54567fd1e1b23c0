use wasm_bindgen::prelude::*;
use orrery_engine::*;

pub mod bodies;
pub mod clock;
pub mod game;
pub mod orbit;
pub mod registry;
use game::SolarSystem;

orrery_web::export_game!(SolarSystem, "solar-system", vectors);
