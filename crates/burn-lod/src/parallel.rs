/// Runs the given closure inside the rayon thread pool when the `parallel` feature is enabled.
macro_rules! run_par {
    (
        $func:expr
    ) => {{
        #[cfg(feature = "parallel")]
        let output = rayon::scope(|_| $func());

        #[cfg(not(feature = "parallel"))]
        let output = $func();

        output
    }};
}

/// Drives an [ndarray::Zip] with rayon when the `parallel` feature is enabled.
macro_rules! zip_par {
    (
        $zip:expr,
        $func:expr
    ) => {{
        #[cfg(feature = "parallel")]
        $zip.par_for_each($func);

        #[cfg(not(feature = "parallel"))]
        $zip.for_each($func);
    }};
}

pub(crate) use run_par;
pub(crate) use zip_par;
