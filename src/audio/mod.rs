// Audio file handling

pub mod wav_io;

pub use wav_io::{read_wav, wav_duration_secs, write_wav};
