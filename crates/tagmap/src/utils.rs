use chrono::Local;
use chrono::NaiveDateTime;

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
