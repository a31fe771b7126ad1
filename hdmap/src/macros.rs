// Call the log crate, but pre-set the target.

macro_rules! debug {
    ( $( $x:expr ),* ) => {
        {
            extern crate log;
            log::log!(target: "hdmap", log::Level::Debug, $( $x, )* );
        }
    }
}

macro_rules! info {
    ( $( $x:expr ),* ) => {
        {
            extern crate log;
            log::log!(target: "hdmap", log::Level::Info, $( $x, )* );
        }
    }
}

macro_rules! warn {
    ( $( $x:expr ),* ) => {
        {
            extern crate log;
            log::log!(target: "hdmap", log::Level::Warn, $( $x, )* );
        }
    }
}
