pub mod api;

pub mod monitoring {
    pub mod v3;
}
