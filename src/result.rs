use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("sled error")]
    Sled(#[from] sled::Error),
    #[error("serializer error")]
    Serializer(#[from] bincode::Error),
    #[error("table name `{0}` is reserved")]
    ReservedName(String),
}

pub type DbResult<T> = Result<T, RosterError>;
