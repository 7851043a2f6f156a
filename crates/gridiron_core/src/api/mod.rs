pub mod json_api;

pub use json_api::{
    project_game_json, simulate_game_json, GameRequest, GameResponse, ProjectionRequest,
    SCHEMA_VERSION,
};
