use {
    bevy::prelude::*,
    chrono::Local,
    std::{collections::HashMap, fs, io, path::PathBuf},
};

/// Plain string key-value store backing guide counters and the saved
/// progression snapshot. The file is a single JSON object of string
/// values, nothing more.
#[derive(Resource, Debug, Default)]
pub struct ProfileStore {
    values: HashMap<String, String>,
    path: Option<PathBuf>,
    dirty: bool,
}

impl ProfileStore {
    /// Store with no backing file; used by tests and as the placeholder
    /// until the profile file is loaded.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the store from `path`, creating an empty one when the file
    /// does not exist. An unreadable file is moved aside (timestamped
    /// `.bad.json`) so a corrupt profile never blocks a session.
    pub fn at_path(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<HashMap<String, String>>(&contents) {
                Ok(values) => values,
                Err(error) => {
                    warn!(path = %path.display(), "profile unreadable, starting fresh: {error}");
                    back_up_corrupt(&path);
                    HashMap::new()
                }
            },
            Err(error) if error.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(error) => {
                warn!(path = %path.display(), "profile unreadable, starting fresh: {error}");
                HashMap::new()
            }
        };
        Self {
            values,
            path: Some(path),
            dirty: false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if self.values.get(key) != Some(&value) {
            self.values.insert(key.to_string(), value);
            self.dirty = true;
        }
    }

    pub fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.dirty = true;
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the store to its backing file, if any. A store without a
    /// path only clears the dirty flag.
    pub fn flush(&mut self) -> io::Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(&self.values)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            fs::write(path, contents)?;
        }
        self.dirty = false;
        Ok(())
    }
}

fn back_up_corrupt(path: &std::path::Path) {
    let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let backup = path.with_file_name(format!("profile_{stamp}.bad.json"));
    if let Err(error) = fs::rename(path, &backup) {
        warn!(path = %path.display(), "could not move corrupt profile aside: {error}");
    } else {
        info!(backup = %backup.display(), "corrupt profile moved aside");
    }
}
