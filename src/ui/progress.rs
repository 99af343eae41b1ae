use anyhow::Result;
use filecrypt_rs::Progress;
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal progress bar fed by the engine's progress callback.
pub struct Bar {
    bar: ProgressBar,
}

impl Bar {
    pub fn new(total: u64, description: &str) -> Result<Self> {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar().template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")?.progress_chars("●○ ");

        bar.set_style(style);
        bar.set_message(description.to_owned());

        Ok(Self { bar })
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Done");
    }

    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

impl Progress for Bar {
    fn report(&mut self, _min: u64, max: u64, value: u64) {
        if self.bar.length() != Some(max) {
            self.bar.set_length(max);
        }
        self.bar.set_position(value);
    }
}

impl Drop for Bar {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_follows_reports() {
        let mut bar = Bar::new(0, "Encrypting...").unwrap();
        bar.report(0, 500, 200);
        assert_eq!(bar.bar.length(), Some(500));
        assert_eq!(bar.bar.position(), 200);

        bar.report(0, 500, 500);
        bar.finish();
        assert!(bar.bar.is_finished());
    }
}
