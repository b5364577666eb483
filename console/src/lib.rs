#[macro_export]
macro_rules! debug {
    ($($args:tt)*) => {{
        $crate::debug(&format!($($args)*));
    }}
}

#[macro_export]
macro_rules! err {
    ($($args:tt)*) => {{
        $crate::err(&format!($($args)*));
    }}
}

#[macro_export]
macro_rules! log {
    ($($args:tt)*) => {{
        $crate::log(&format!($($args)*));
    }}
}

#[macro_export]
macro_rules! warning {
    ($($args:tt)*) => {{
        $crate::warning(&format!($($args)*));
    }}
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use wasm_bindgen::prelude::*;

        #[wasm_bindgen]
        extern "C" {
            #[wasm_bindgen(js_namespace = console)]
            pub fn debug(s: &str);

            #[wasm_bindgen(js_namespace = console, js_name = error)]
            pub fn err(s: &str);

            #[wasm_bindgen(js_namespace = console)]
            pub fn log(s: &str);

            #[wasm_bindgen(js_namespace = console, js_name = warn)]
            pub fn warning(s: &str);
        }
    } else {
        pub fn debug(s: &str) {
            ::log::debug!("{}", s);
        }

        pub fn err(s: &str) {
            ::log::error!("{}", s);
        }

        pub fn log(s: &str) {
            ::log::info!("{}", s);
        }

        pub fn warning(s: &str) {
            ::log::warn!("{}", s);
        }
    }
}
