//////////////////////////////////////////////////////////////////////
// use error chain so we can use Result<> everywhere
// for error handling

error_chain! {

    foreign_links {
        Fmt(::std::fmt::Error);
        Io(::std::io::Error);
        ParseInt(::std::num::ParseIntError);
    }

    errors {

        InvalidRational(numerator: String) {
            description("rational with zero denominator")
            display("invalid rational {}/0", numerator)
        }

        DivisionByZero(what: &'static str) {
            description("division by zero")
            display("division by zero in {}", what)
        }

        GeometryInvariant(detail: String) {
            description("geometric invariant violated")
            display("geometric invariant violated: {}", detail)
        }

        InvalidPath(detail: String) {
            description("invalid path through tiling tree")
            display("invalid tiling tree path: {}", detail)
        }

        Parse(detail: String) {
            description("parse error")
            display("parse error: {}", detail)
        }

    }

}
