#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("an error occurred parsing the file")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Parsing(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("cycle in parent pointers involving record {0}")]
    ParentCycle(String),

    #[error("malformed tree specifier: {0}")]
    BadSpecifier(String),

    #[error("cannot find a taxon file in {0}")]
    FileNotFound(String),
}
