pub mod ytdlp;

pub use ytdlp::YtDlp;
