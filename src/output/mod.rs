pub mod formatter;

pub use formatter::{
    format_games, format_games_list, format_json, format_tsv_games, format_tsv_win_rate,
    format_win_rate, should_use_colors, Difficulty,
};
