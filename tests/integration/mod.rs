mod helpers;

mod test_bump;
mod test_icon;
mod test_package;
mod test_sample;
mod test_wrap;
