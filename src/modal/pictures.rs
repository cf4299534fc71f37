use serde::Serialize;

pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "pdf"];
pub const INVALID_TYPE_MESSAGE: &str = "Only JPEG, PNG, GIF and PDF files are accepted.";

pub fn is_accepted(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    match lower.rsplit_once('.') {
        Some((stem, ext)) => !stem.is_empty() && ACCEPTED_EXTENSIONS.contains(&ext),
        None => false,
    }
}

fn is_pdf(file_name: &str) -> bool {
    file_name.ends_with(".pdf")
}

/// Thumbnail of a freshly uploaded file. Only PDFs get one from the
/// server; images are previewed from the local file.
pub fn uploaded_thumbnail(file_name: &str) -> Option<String> {
    if is_pdf(file_name) {
        Some(file_name.replacen(".pdf", "-360.png", 1))
    } else {
        None
    }
}

/// Thumbnail of a picture already attached to the item.
pub fn existing_thumbnail(file_name: &str) -> String {
    if is_pdf(file_name) {
        file_name.replacen(".pdf", "-360.png", 1)
    } else {
        file_name.replacen('.', "-360.", 1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PictureFile {
    pub name: String,
    pub server_name: Option<String>,
    pub thumbnail: Option<String>,
    pub uploading: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PictureOption {
    pub value: String,
    pub selected: bool,
}

/// Pictures attached to the open item form: the upload widget's file list
/// and the hidden multi-select that is submitted with the form. Every
/// accepted file has a selected option; removing the file deselects it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PictureSet {
    files: Vec<PictureFile>,
    options: Vec<PictureOption>,
    pictures_path: String,
    pictures_url: String,
}

impl PictureSet {
    pub fn new(pictures_path: &str, pictures_url: &str) -> Self {
        Self {
            files: Vec::new(),
            options: Vec::new(),
            pictures_path: pictures_path.to_string(),
            pictures_url: pictures_url.to_string(),
        }
    }

    /// Registers pictures that were attached before the form opened.
    pub fn with_existing(mut self, pictures: &[String]) -> Self {
        for name in pictures {
            self.options.push(PictureOption {
                value: name.clone(),
                selected: true,
            });
            self.files.push(PictureFile {
                name: name.clone(),
                server_name: Some(name.clone()),
                thumbnail: Some(format!("{}{}", self.pictures_path, existing_thumbnail(name))),
                uploading: false,
            });
        }
        self
    }

    pub fn files(&self) -> &[PictureFile] {
        &self.files
    }

    pub fn options(&self) -> &[PictureOption] {
        &self.options
    }

    /// Queues a local file. Returns its index in the file list.
    pub fn add_file(&mut self, name: &str) -> usize {
        self.files.push(PictureFile {
            name: name.to_string(),
            server_name: None,
            thumbnail: None,
            uploading: true,
        });
        self.files.len() - 1
    }

    /// Records the server's acceptance of the file at `index`.
    pub fn accept(&mut self, index: usize, server_name: &str) -> Option<&PictureFile> {
        let thumbnail = uploaded_thumbnail(server_name).map(|t| format!("{}{}", self.pictures_url, t));
        let file = self.files.get_mut(index)?;
        file.server_name = Some(server_name.to_string());
        file.thumbnail = thumbnail;
        file.uploading = false;
        self.options.push(PictureOption {
            value: server_name.to_string(),
            selected: true,
        });
        self.files.get(index)
    }

    /// Drops a file the server refused or that never reached it.
    pub fn reject(&mut self, index: usize) -> Option<PictureFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    /// Removes a file from the widget; its option stays but is deselected.
    pub fn remove_file(&mut self, index: usize) -> Option<PictureFile> {
        if index >= self.files.len() {
            return None;
        }
        let file = self.files.remove(index);
        if let Some(server_name) = file.server_name.as_deref() {
            for option in self.options.iter_mut().filter(|o| o.value == server_name) {
                option.selected = false;
            }
        }
        Some(file)
    }

    /// Index of the first queued file called `name` still waiting for the
    /// server.
    pub fn pending_index(&self, name: &str) -> Option<usize> {
        self.files.iter().position(|f| f.uploading && f.name == name)
    }

    pub fn is_uploading(&self) -> bool {
        self.files.iter().any(|f| f.uploading)
    }

    /// Filenames submitted with the form.
    pub fn selected(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.clone())
            .collect()
    }

    pub fn accepted_files(&self) -> Vec<String> {
        self.files
            .iter()
            .filter_map(|f| f.server_name.clone())
            .collect()
    }
}
