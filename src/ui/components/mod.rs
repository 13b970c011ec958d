pub mod blitz_view;
pub mod definition_popup;
pub mod login_view;
pub mod menu;
pub mod mistakes_view;
pub mod passage_view;
pub mod progress_bar;
pub mod question_panel;
pub mod stats_dashboard;
pub mod styled_text;
pub mod trainer_view;
pub mod vocabulary_list;
pub mod week_list;
pub mod xp_header;
