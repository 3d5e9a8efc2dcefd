mod vhost;

pub use vhost::find_virtual_host;
