mod cleaner;
mod config;
mod engine;
mod error;
mod exif_reader;
mod history;
mod metadata;
mod planner;
mod suggest;
mod visual;

pub use cleaner::clean_name;
pub use config::{
    app_paths, load_config, load_config_from, save_config, save_config_to, AppConfig, AppPaths,
};
pub use engine::{RenameEngine, UndoOutcome};
pub use error::{RenameError, RenameResult};
pub use exif_reader::read_capture_date;
pub use history::{RenameRecord, UndoBatch, UndoHistory, DEFAULT_HISTORY_CAPACITY};
pub use metadata::{Brightness, CaptureDate};
pub use planner::{collect_files, plan_batch, replace_stem, BatchPlan, NameSpec, PlannedRename};
pub use suggest::{
    suggest_many, ExifSuggester, NameSuggester, NoSuggester, SuggesterKind, Suggestion,
    VisualSuggester,
};
pub use visual::{
    brightness_of, classify_brightness, count_faces, face_count_of, mean_luma, FaceDetector,
    VisualOptions,
};
